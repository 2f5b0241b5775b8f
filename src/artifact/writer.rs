//! Artifact generation: merged JSON, TypeScript stub, key export

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::GroupSpec;
use crate::error::FoldResult;
use crate::fs::write_output;
use crate::merge::Tree;

use super::keys::flatten_keys;

/// Files written by one generation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactReport {
    /// Paths written successfully
    pub written: Vec<PathBuf>,
    /// Outputs that failed to render or write
    pub errors: Vec<String>,
    /// Outputs skipped because of incomplete settings
    pub warnings: Vec<String>,
}

impl ArtifactReport {
    /// Check if every output that could be written was written.
    ///
    /// Warnings do not count as failures.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Serialize a tree as pretty JSON: two-space indent, sorted keys, no HTML
/// escaping, trailing newline.
pub fn render_json(tree: &Tree) -> FoldResult<String> {
    let mut text = serde_json::to_string_pretty(tree).map_err(std::io::Error::from)?;
    text.push('\n');
    Ok(text)
}

/// Derive a TypeScript interface stub from serialized JSON.
///
/// This is textual: every `: "..."` run up to the end of its line becomes
/// `: string`, wherever it occurs. Nested objects keep their JSON shape.
pub fn render_ts_interface(json_text: &str, interface_name: &str) -> String {
    static STRING_VALUE: OnceLock<Regex> = OnceLock::new();
    let re = STRING_VALUE.get_or_init(|| Regex::new(r#": ".*""#).expect("valid regex"));
    let body = re.replace_all(json_text, ": string");
    format!("export interface {interface_name} {body}")
}

/// Render the key export module: `export const <name> = <json>`.
///
/// With `flatten`, the value is the flat path table; otherwise it is the
/// tree with every string leaf replaced by its own path.
pub fn render_key_export(tree: &Tree, name: &str, flatten: bool) -> FoldResult<String> {
    let mut rewritten = tree.clone();
    let table = flatten_keys(&mut rewritten)?;

    let value = if flatten {
        serde_json::to_string(&table)
    } else {
        serde_json::to_string(&Value::Object(rewritten))
    }
    .map_err(std::io::Error::from)?;

    Ok(format!("export const {name} = {value}"))
}

/// Write every artifact configured for `spec`.
///
/// Each output is independent: a failure in one is recorded and logged and
/// does not stop the others.
pub fn write_artifacts(spec: &GroupSpec, tree: &Tree) -> ArtifactReport {
    let mut report = ArtifactReport::default();
    let group = spec.display_name();

    let json_text = match render_json(tree) {
        Ok(text) => text,
        Err(e) => {
            error!(group = %group, error = %e, "failed to serialize merged tree");
            report.errors.push(e.to_string());
            return report;
        }
    };
    record(&mut report, &group, &spec.output, write_output(&spec.output, json_text.as_bytes()));

    match (spec.ts_output(), spec.ts_name()) {
        (Some(path), Some(name)) => {
            let stub = render_ts_interface(&json_text, name);
            record(&mut report, &group, path, write_output(path, stub.as_bytes()));
        }
        (None, None) => {}
        _ => {
            warn!(group = %group, "ts interface output or name not set, skipping stub");
            report
                .warnings
                .push("ts interface output or name not set".to_string());
        }
    }

    if let Some(path) = spec.key_export_output() {
        match render_key_export(tree, spec.key_export_name(), spec.key_flatten) {
            Ok(text) => record(&mut report, &group, path, write_output(path, text.as_bytes())),
            Err(e) => {
                error!(group = %group, error = %e, "key export aborted");
                report.errors.push(e.to_string());
            }
        }
    }

    report
}

fn record(report: &mut ArtifactReport, group: &str, path: &std::path::Path, result: FoldResult<()>) {
    match result {
        Ok(()) => {
            info!(group = %group, path = %path.display(), "wrote");
            report.written.push(path.to_path_buf());
        }
        Err(e) => {
            error!(group = %group, path = %path.display(), error = %e, "write failed");
            report.errors.push(format!("{}: {}", path.display(), e));
        }
    }
}
