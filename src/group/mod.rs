//! Watch group runtime
//!
//! A running group owns one notifier, one debouncer and one merge pass at a
//! time. Groups share nothing with each other: each gets its own copy of
//! its spec and the debounce delay when it starts.

mod fan_out;

pub use fan_out::{fan_out_children, run_fan_out};

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use notify::{RecommendedWatcher, Watcher};
use tracing::{debug, error, info, warn};

use crate::artifact::{write_artifacts, ArtifactReport};
use crate::config::GroupSpec;
use crate::error::{FoldError, FoldResult};
use crate::fs::{is_temp_output, parent_dir};
use crate::merge::build_tree;
use crate::supervisor::{CancelToken, Supervisor, POLL_INTERVAL};
use crate::watcher::{watch_one, watch_tree, Change, Debouncer};

static NEXT_INDEX: AtomicUsize = AtomicUsize::new(1);

/// Next value of the process-wide group index
pub fn next_group_index() -> usize {
    NEXT_INDEX.fetch_add(1, Ordering::SeqCst)
}

/// A group ready to run: its spec, debounce delay and index
#[derive(Debug, Clone)]
pub struct WatchGroup {
    pub spec: GroupSpec,
    pub delay: Duration,
    pub index: usize,
}

impl WatchGroup {
    /// Create a group with the next index
    pub fn new(spec: GroupSpec, delay: Duration) -> Self {
        Self {
            spec,
            delay,
            index: next_group_index(),
        }
    }

    pub fn name(&self) -> String {
        self.spec.display_name()
    }

    fn worker_name(&self) -> String {
        format!("{}#{}", self.name(), self.index)
    }
}

/// Result of one merge pass
#[derive(Debug)]
pub enum MergeOutcome {
    /// The group was already cancelled; nothing was read or written
    Skipped,
    /// Reading or parsing sources failed; nothing was written
    Failed(FoldError),
    /// The tree was built and artifacts were generated
    Written(ArtifactReport),
}

/// Rebuild a group's outputs from the current filesystem state.
pub fn merge_group(spec: &GroupSpec, cancel: &CancelToken) -> MergeOutcome {
    let name = spec.display_name();
    if cancel.is_cancelled() {
        debug!(group = %name, "group cancelled, skipping merge");
        return MergeOutcome::Skipped;
    }

    info!(group = %name, "merging");
    match build_tree(spec) {
        Ok(tree) => MergeOutcome::Written(write_artifacts(spec, &tree)),
        Err(e) => {
            error!(group = %name, error = %e, "merge aborted");
            MergeOutcome::Failed(e)
        }
    }
}

/// Start a group (plain or fan-out) under `supervisor`.
///
/// Fatal errors raised inside the worker are sent on `fatal`.
pub fn start_group(
    supervisor: &mut Supervisor,
    spec: GroupSpec,
    delay: Duration,
    fatal: Sender<FoldError>,
) -> FoldResult<()> {
    let group = WatchGroup::new(spec, delay);
    let worker_name = group.worker_name();

    supervisor.spawn(worker_name, move |cancel| {
        let name = group.name();
        let index = group.index;
        let result = if group.spec.is_fan_out() {
            run_fan_out(group, cancel, fatal.clone())
        } else {
            run_group(group, cancel)
        };

        if let Err(e) = result {
            if e.is_fatal() {
                error!(group = %name, index, error = %e, "fatal group error");
                let _ = fatal.send(e);
            } else {
                error!(group = %name, index, error = %e, "group stopped with error");
            }
        }
    })
}

/// Run one group until `cancel` is set.
///
/// Registers watches, performs one unconditional merge, then feeds every
/// relevant event to the debouncer. Directories created while running are
/// registered as they appear.
pub fn run_group(group: WatchGroup, cancel: CancelToken) -> FoldResult<()> {
    let name = group.name();
    let index = group.index;

    let (tx, rx) = channel::<notify::Result<notify::Event>>();
    let mut watcher =
        RecommendedWatcher::new(tx, notify::Config::default()).map_err(FoldError::WatcherInit)?;
    register_sources(&mut watcher, &group.spec);

    let spec = Arc::new(group.spec);
    let debouncer = {
        let spec = Arc::clone(&spec);
        let cancel = cancel.clone();
        Debouncer::spawn(&name, group.delay, cancel.clone(), move || {
            merge_group(&spec, &cancel);
        })?
    };

    merge_group(&spec, &cancel);
    info!(group = %name, index, "watching");

    while !cancel.is_cancelled() {
        let event = match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => {
                warn!(group = %name, error = %e, "watch error");
                continue;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let Some(mut change) = Change::from_event(event) else {
            continue;
        };
        change
            .paths
            .retain(|p| !is_own_output(&spec, p) && is_source_path(&spec, p));
        if change.paths.is_empty() {
            continue;
        }

        if change.kind.may_add_directory() {
            for path in change.paths.iter().filter(|p| p.is_dir()) {
                if let Err(e) = watch_tree(&mut watcher, path) {
                    warn!(group = %name, error = %e, "failed to watch new directory");
                }
            }
        }

        debug!(group = %name, kind = ?change.kind, paths = ?change.paths, "change");
        debouncer.schedule();
    }

    drop(watcher);
    drop(debouncer);
    info!(group = %name, index, "group stopped");
    Ok(())
}

/// Register every explicit file and folder of a group.
///
/// Explicit files are watched through their directory, so a file replaced
/// by rename keeps being seen. Missing sources are logged; the merge pass
/// reports them as errors.
fn register_sources<W: Watcher + ?Sized>(watcher: &mut W, spec: &GroupSpec) {
    let name = spec.display_name();
    let file_dirs: BTreeSet<_> = spec
        .watch_list
        .iter()
        .flat_map(|list| &list.files)
        .map(|file| parent_dir(file))
        .collect();
    for dir in &file_dirs {
        if let Err(e) = watch_one(watcher, dir) {
            warn!(group = %name, error = %e, "cannot watch file directory");
        }
    }

    for list in &spec.watch_list {
        for folder in &list.folders {
            if let Err(e) = watch_tree(watcher, folder) {
                warn!(group = %name, error = %e, "cannot watch folder");
            }
        }
    }
}

/// Whether `path` is one of the group's explicit files or lies under one of
/// its folders. Siblings of explicit files are ignored.
fn is_source_path(spec: &GroupSpec, path: &Path) -> bool {
    spec.watch_list.iter().any(|list| {
        list.files.iter().any(|file| {
            file.file_name().is_some()
                && file.file_name() == path.file_name()
                && parent_dir(file) == parent_dir(path)
        }) || list.folders.iter().any(|folder| path.starts_with(folder))
    })
}

/// Events on the group's own outputs must not trigger another merge.
fn is_own_output(spec: &GroupSpec, path: &Path) -> bool {
    is_temp_output(path)
        || path == spec.output
        || spec.ts_output() == Some(path)
        || spec.key_export_output() == Some(path)
}
