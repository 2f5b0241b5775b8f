//! Reading a group's sources into one merged tree

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::config::{GroupSpec, KeyStrategy};
use crate::error::{FoldError, FoldResult};

use super::tree::{deep_merge, with_subtree, Tree};

/// Build the merged tree for one group from the current filesystem state.
///
/// Explicit files come first (in configuration order), then folders. Any
/// error aborts the whole build; nothing partial is returned.
pub fn build_tree(spec: &GroupSpec) -> FoldResult<Tree> {
    let mut out = Tree::new();

    for list in &spec.watch_list {
        for file in &list.files {
            let doc = read_source(file)?;
            match spec.key_type {
                KeyStrategy::JoinFolderFile => with_subtree(&mut out, &file_key(file), |sub| {
                    deep_merge(sub, doc);
                }),
                KeyStrategy::Original => {
                    deep_merge(&mut out, doc);
                }
            }
        }
        for folder in &list.folders {
            merge_folder(&mut out, folder, &spec.suffix, spec.key_type)?;
        }
    }

    Ok(out)
}

/// Merge every matching file below `folder` into `out`.
///
/// Subdirectories are handled before the files of the same level, each
/// group in file-name order. Files are nested under their stem.
pub fn merge_folder(
    out: &mut Tree,
    folder: &Path,
    suffix: &str,
    key_type: KeyStrategy,
) -> FoldResult<()> {
    let (dirs, files) = list_folder(folder)?;

    for dir in &dirs {
        match key_type {
            KeyStrategy::JoinFolderFile => with_subtree(out, &dir_key(dir), |sub| {
                merge_folder(sub, dir, suffix, key_type)
            })?,
            KeyStrategy::Original => merge_folder(out, dir, suffix, key_type)?,
        }
    }

    for file in &files {
        let matches = file
            .file_name()
            .map(|n| n.to_string_lossy().ends_with(suffix))
            .unwrap_or(false);
        if !matches {
            continue;
        }
        let doc = read_source(file)?;
        with_subtree(out, &file_key(file), |sub| {
            deep_merge(sub, doc);
        });
    }

    Ok(())
}

/// Read and parse one source document.
///
/// Zero-length files are rejected, as is any document whose top level is
/// not a JSON object.
pub fn read_source(path: &Path) -> FoldResult<Tree> {
    let bytes = fs::read(path).map_err(|source| FoldError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(FoldError::EmptySource {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "merging source");

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(FoldError::NotAnObject {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(FoldError::InvalidJson {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Split a folder's entries into sorted subdirectories and sorted files.
fn list_folder(folder: &Path) -> FoldResult<(Vec<PathBuf>, Vec<PathBuf>)> {
    let read_err = |source| FoldError::SourceRead {
        path: folder.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(folder).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let file_type = entry.file_type().map_err(read_err)?;
        if file_type.is_dir() {
            dirs.push(entry.path());
        } else {
            files.push(entry.path());
        }
    }
    dirs.sort();
    files.sort();

    Ok((dirs, files))
}

/// Key for a file: its name without the last extension
fn file_key(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Key for a directory: its base name
fn dir_key(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
