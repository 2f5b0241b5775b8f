//! Group lifecycle management
//!
//! Owns every running group. On start and on every change to the
//! configuration file it shuts the current generation down (cancel + join),
//! reloads the configuration and starts a fresh generation from the new
//! snapshot. A configuration that cannot be loaded is retried a second
//! later; the process keeps running either way.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{FoldError, FoldResult};
use crate::fs::parent_dir;
use crate::group::{fan_out_children, merge_group, start_group, MergeOutcome};
use crate::supervisor::{CancelToken, Supervisor, POLL_INTERVAL};
use crate::watcher::{Change, ChangeKind};

/// Quiet period after a config change before reloading
pub const CONFIG_SETTLE: Duration = Duration::from_millis(100);

/// Delay before retrying a failed configuration load
pub const RELOAD_RETRY: Duration = Duration::from_secs(1);

/// Supervises the groups described by one configuration file
#[derive(Debug)]
pub struct Lifecycle {
    config_path: PathBuf,
    supervisor: Supervisor,
    fatal_tx: Sender<FoldError>,
    fatal_rx: Receiver<FoldError>,
    generation: usize,
}

impl Lifecycle {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        let (fatal_tx, fatal_rx) = channel();
        Self {
            config_path: config_path.into(),
            supervisor: Supervisor::new(),
            fatal_tx,
            fatal_rx,
            generation: 0,
        }
    }

    /// Number of successful loads so far
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Worker names of the current generation
    pub fn active_groups(&self) -> Vec<String> {
        self.supervisor.names()
    }

    /// Stop the current generation, reload the configuration and start the
    /// next one.
    ///
    /// Old groups are always gone when this returns, even if loading fails.
    pub fn reload(&mut self) -> FoldResult<Arc<Config>> {
        if !self.supervisor.is_empty() {
            info!(groups = self.supervisor.len(), "stopping active groups");
        }
        self.supervisor.shutdown();

        let (config, warnings) = Config::load_with_warnings(&self.config_path)?;
        for warning in &warnings {
            warn!("{}", warning);
        }
        let config = Arc::new(config);

        for spec in &config.list {
            start_group(
                &mut self.supervisor,
                spec.clone(),
                config.delay(),
                self.fatal_tx.clone(),
            )?;
        }

        self.generation += 1;
        info!(
            generation = self.generation,
            groups = config.list.len(),
            delay_us = config.delay,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Stop every group
    pub fn shutdown(&mut self) {
        self.supervisor.shutdown();
    }

    /// Watch the configuration file and keep groups in sync with it until
    /// `running` is cleared.
    ///
    /// Returns an error only for fatal conditions: the notifier cannot be
    /// created, or a group reports a fatal error.
    pub fn run(mut self, running: Arc<AtomicBool>) -> FoldResult<()> {
        let (tx, rx) = channel::<notify::Result<notify::Event>>();
        let mut watcher =
            RecommendedWatcher::new(tx, notify::Config::default()).map_err(FoldError::WatcherInit)?;

        let watch_dir = parent_dir(&self.config_path);
        let file_name = self.config_path.file_name().map(|n| n.to_os_string());
        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|source| FoldError::Watch {
                path: watch_dir.clone(),
                source,
            })?;
        info!(config = %self.config_path.display(), "watching configuration");

        let mut retry = Deadline::default();
        self.try_reload(&mut retry)?;

        let mut settle = Deadline::default();
        while running.load(Ordering::SeqCst) {
            if let Ok(e) = self.fatal_rx.try_recv() {
                self.shutdown();
                return Err(e);
            }

            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) => {
                    if is_config_change(event, file_name.as_deref()) {
                        debug!("configuration change detected");
                        settle.arm(CONFIG_SETTLE);
                    }
                }
                Ok(Err(e)) => warn!(error = %e, "config watch error"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            let now = Instant::now();
            if settle.is_due(now) || retry.is_due(now) {
                settle.take();
                retry.take();
                self.try_reload(&mut retry)?;
            }
        }

        info!("shutting down");
        self.shutdown();
        Ok(())
    }

    fn try_reload(&mut self, retry: &mut Deadline) -> FoldResult<()> {
        match self.reload() {
            Ok(_) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                error!(error = %e, "failed to load configuration, retrying");
                retry.arm(RELOAD_RETRY);
                Ok(())
            }
        }
    }
}

/// A pending reload: armed by a config change or a failed load
#[derive(Debug, Default)]
struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Fire `after` from now, replacing any earlier deadline
    fn arm(&mut self, after: Duration) {
        self.at = Some(Instant::now() + after);
    }

    fn is_due(&self, now: Instant) -> bool {
        self.at.map(|at| now >= at).unwrap_or(false)
    }

    /// Disarm; returns whether a deadline was set
    fn take(&mut self) -> bool {
        self.at.take().is_some()
    }
}

/// Writes, creations and rename-targets of the config file itself
fn is_config_change(event: notify::Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    let Some(change) = Change::from_event(event) else {
        return false;
    };
    if change.kind == ChangeKind::Removed {
        return false;
    }
    change
        .paths
        .iter()
        .any(|p| p.file_name().is_some() && p.file_name() == file_name)
}

/// Outcome of one group in a one-shot build
#[derive(Debug)]
pub struct GroupBuild {
    pub name: String,
    pub outcome: MergeOutcome,
}

impl GroupBuild {
    pub fn is_success(&self) -> bool {
        match &self.outcome {
            MergeOutcome::Written(report) => report.is_success(),
            MergeOutcome::Skipped | MergeOutcome::Failed(_) => false,
        }
    }
}

/// Run one merge pass for every group (fan-out groups expanded), without
/// watching.
pub fn build_once(config: &Config) -> Vec<GroupBuild> {
    let cancel = CancelToken::new();
    let mut builds = Vec::new();

    for spec in &config.list {
        if !spec.is_fan_out() {
            builds.push(GroupBuild {
                name: spec.display_name(),
                outcome: merge_group(spec, &cancel),
            });
            continue;
        }

        match fan_out_children(spec) {
            Ok(children) => {
                for child in &children {
                    builds.push(GroupBuild {
                        name: child.display_name(),
                        outcome: merge_group(child, &cancel),
                    });
                }
            }
            Err(e) => {
                error!(group = %spec.display_name(), error = %e, "cannot list fan-out children");
                builds.push(GroupBuild {
                    name: spec.display_name(),
                    outcome: MergeOutcome::Failed(e),
                });
            }
        }
    }

    builds
}
