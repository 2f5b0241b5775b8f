//! Output file writing
//!
//! Artifacts are written through a temp file in the destination directory
//! and renamed into place, so a reader never sees a half-written file.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::FoldResult;

/// Prefix of the temp files created next to outputs while writing
pub const TEMP_PREFIX: &str = ".jsonfold-";

/// Whether `path` is one of our in-flight temp files
pub fn is_temp_output(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with(TEMP_PREFIX))
        .unwrap_or(false)
}

/// Directory holding `path`; a bare file name lives in `.`
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Write `content` to `path`, creating parent directories and replacing any
/// existing file.
pub fn write_output(path: &Path, content: &[u8]) -> FoldResult<()> {
    let parent = parent_dir(path);
    std::fs::create_dir_all(&parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(&parent)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
