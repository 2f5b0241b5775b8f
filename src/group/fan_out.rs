//! Fan-out groups: one child group per subdirectory of a root
//!
//! The parent does no merging itself. It keeps a child supervisor and
//! restarts its children when directories appear or disappear directly
//! under the root.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::config::{FolderMode, GroupSpec, WatchList};
use crate::error::{FoldError, FoldResult};
use crate::fs::is_temp_output;
use crate::supervisor::{CancelToken, Supervisor, POLL_INTERVAL};
use crate::watcher::Change;

use super::{start_group, WatchGroup};

/// Interface name prefix used when the parent declares none
pub const DEFAULT_INTERFACE_PREFIX: &str = "II18n";

/// Synthesize one child spec per immediate subdirectory of the fan-out root.
///
/// Children are returned in directory-name order. A parent without a root
/// yields no children.
pub fn fan_out_children(parent: &GroupSpec) -> FoldResult<Vec<GroupSpec>> {
    let Some(root) = parent.fan_out_source() else {
        warn!(group = %parent.display_name(), "fan-out group has no root folder");
        return Ok(Vec::new());
    };

    let read_err = |source| FoldError::SourceRead {
        path: root.to_path_buf(),
        source,
    };
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(root).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_dir() {
            subdirs.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    subdirs.sort();

    Ok(subdirs
        .iter()
        .map(|sub| child_spec(parent, root, sub))
        .collect())
}

fn child_spec(parent: &GroupSpec, root: &Path, sub: &str) -> GroupSpec {
    let prefix = parent.ts_name().unwrap_or(DEFAULT_INTERFACE_PREFIX);

    GroupSpec {
        name: format!("{}/{}", parent.display_name(), sub),
        output: parent.output.join(format!("{sub}.json")),
        suffix: parent.suffix.clone(),
        folder_type: FolderMode::Single,
        key_type: parent.key_type,
        ts_interface_output: Some(parent.output.join(format!("{sub}.i18n.interface.ts"))),
        ts_interface_name: Some(format!("{prefix}{sub}")),
        key_output: parent
            .key_export_output()
            .map(|dir| dir.join(format!("{sub}.keys.ts"))),
        key_value_name: parent.key_value_name.clone(),
        key_flatten: parent.key_flatten,
        watch_list: vec![WatchList {
            files: Vec::new(),
            folders: vec![root.join(sub)],
        }],
        fan_out_root: None,
    }
}

/// Pending restart of the children, armed by root-level directory changes
#[derive(Debug)]
struct PendingRescan {
    last_change: Option<Instant>,
    delay: Duration,
}

impl PendingRescan {
    fn new(delay: Duration) -> Self {
        Self {
            last_change: None,
            delay,
        }
    }

    fn add_change(&mut self) {
        self.last_change = Some(Instant::now());
    }

    fn should_rescan(&self) -> bool {
        self.last_change
            .map(|last| last.elapsed() >= self.delay)
            .unwrap_or(false)
    }

    fn take(&mut self) {
        self.last_change = None;
    }
}

/// Run a fan-out parent until `cancel` is set.
pub fn run_fan_out(
    group: WatchGroup,
    cancel: CancelToken,
    fatal: Sender<FoldError>,
) -> FoldResult<()> {
    let name = group.name();
    let root: Option<PathBuf> = group.spec.fan_out_source().map(Path::to_path_buf);
    let mut children = Supervisor::new();

    start_children(&group, &mut children, &fatal)?;

    let (tx, rx) = channel::<notify::Result<notify::Event>>();
    let mut watcher =
        RecommendedWatcher::new(tx, notify::Config::default()).map_err(FoldError::WatcherInit)?;
    if let Some(root) = &root {
        if let Err(e) = watcher.watch(root, RecursiveMode::NonRecursive) {
            warn!(group = %name, root = %root.display(), error = %e, "cannot watch fan-out root");
        }
    }

    info!(group = %name, index = group.index, children = children.len(), "fan-out started");
    let mut pending = PendingRescan::new(group.delay);

    while !cancel.is_cancelled() {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) => {
                if let Some(change) = Change::from_event(event) {
                    if touches_child_dir(root.as_deref(), &change) {
                        debug!(group = %name, paths = ?change.paths, "fan-out root changed");
                        pending.add_change();
                    }
                }
            }
            Ok(Err(e)) => warn!(group = %name, error = %e, "watch error"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if pending.should_rescan() {
            pending.take();
            info!(group = %name, "restarting fan-out children");
            children.shutdown();
            start_children(&group, &mut children, &fatal)?;
        }
    }

    drop(watcher);
    children.shutdown();
    info!(group = %name, index = group.index, "fan-out stopped");
    Ok(())
}

fn start_children(
    group: &WatchGroup,
    children: &mut Supervisor,
    fatal: &Sender<FoldError>,
) -> FoldResult<()> {
    let specs = match fan_out_children(&group.spec) {
        Ok(specs) => specs,
        Err(e) => {
            error!(group = %group.name(), error = %e, "cannot list fan-out children");
            return Ok(());
        }
    };

    for spec in specs {
        start_group(children, spec, group.delay, fatal.clone())?;
    }
    Ok(())
}

/// Whether a change concerns a directory directly under the root.
///
/// Paths that are gone can't be inspected, so a removal or rename-away
/// counts unless it is one of our own temp files.
fn touches_child_dir(root: Option<&Path>, change: &Change) -> bool {
    use crate::watcher::ChangeKind;

    let Some(root) = root else {
        return false;
    };
    change.paths.iter().any(|path| {
        if path.parent() != Some(root) || is_temp_output(path) {
            return false;
        }
        match change.kind {
            ChangeKind::Created => path.is_dir(),
            ChangeKind::Renamed | ChangeKind::Removed => path.is_dir() || !path.exists(),
            ChangeKind::Written => false,
        }
    })
}
