//! Recursive directory registration
//!
//! Every directory is registered non-recursively on its own, so directories
//! created later can be added one by one as their events arrive.

use std::path::Path;

use notify::{RecursiveMode, Watcher};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{FoldError, FoldResult};

/// Register `root` and every directory below it.
///
/// The walk is iterative and does not follow symlinks. Failing to register
/// `root` is an error; failures below it are logged and skipped. Returns the
/// number of directories registered.
pub fn watch_tree<W: Watcher + ?Sized>(watcher: &mut W, root: &Path) -> FoldResult<usize> {
    watch_one(watcher, root)?;
    let mut count = 1;

    for entry in WalkDir::new(root).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        match watch_one(watcher, entry.path()) {
            Ok(()) => count += 1,
            Err(e) => warn!(error = %e, "skipping directory"),
        }
    }

    debug!(root = %root.display(), directories = count, "registered watches");
    Ok(count)
}

/// Register a single path without recursion
pub fn watch_one<W: Watcher + ?Sized>(watcher: &mut W, path: &Path) -> FoldResult<()> {
    watcher
        .watch(path, RecursiveMode::NonRecursive)
        .map_err(|source| FoldError::Watch {
            path: path.to_path_buf(),
            source,
        })
}
