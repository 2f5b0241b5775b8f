//! jsonfold CLI - merges watched JSON fragments into build artifacts
//!
//! Usage: jsonfold [--config <PATH>] [COMMAND]
//!
//! Commands:
//!   watch   Watch sources and the config file, rebuilding on change (default)
//!   build   Build every group once and exit

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

use jsonfold::config::{Config, DEFAULT_CONFIG_FILE};
use jsonfold::group::MergeOutcome;
use jsonfold::lifecycle::{build_once, Lifecycle};

/// jsonfold - fold JSON fragments into merged artifacts
#[derive(Parser, Debug)]
#[command(name = "jsonfold")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print a JSON summary (build only)
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch sources and the config file, rebuilding on change
    Watch,

    /// Build every group once and exit
    Build,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => cmd_watch(&cli.config),
        Commands::Build => cmd_build(&cli.config, cli.json),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_watch(config_path: &Path) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;

    Lifecycle::new(config_path)
        .run(running)
        .context("watcher stopped")?;

    Ok(())
}

fn cmd_build(config_path: &Path, json: bool) -> Result<()> {
    let (config, warnings) = Config::load_with_warnings(config_path)?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let builds = build_once(&config);
    let failed = builds.iter().filter(|b| !b.is_success()).count();

    if json {
        let groups: Vec<_> = builds
            .iter()
            .map(|b| {
                let (status, written, errors, warnings) = match &b.outcome {
                    MergeOutcome::Written(report) => (
                        if report.is_success() { "success" } else { "partial" },
                        report.written.len(),
                        report.errors.len(),
                        report.warnings.len(),
                    ),
                    MergeOutcome::Failed(_) => ("error", 0, 1, 0),
                    MergeOutcome::Skipped => ("skipped", 0, 0, 0),
                };
                serde_json::json!({
                    "group": b.name,
                    "status": status,
                    "written": written,
                    "errors": errors,
                    "warnings": warnings,
                })
            })
            .collect();
        let output = serde_json::json!({
            "event": "build",
            "status": if failed == 0 { "success" } else { "error" },
            "groups": groups,
        });
        println!("{}", serde_json::to_string(&output)?);
    }

    if failed > 0 {
        anyhow::bail!("{} of {} groups failed", failed, builds.len());
    }
    Ok(())
}
