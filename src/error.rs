//! Error types for jsonfold
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for jsonfold operations
pub type FoldResult<T> = Result<T, FoldError>;

/// Main error type for jsonfold operations
#[derive(Error, Debug)]
pub enum FoldError {
    /// IO error without a more specific context
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source document or folder could not be read
    #[error("failed to read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source document exists but has no content
    #[error("empty file: {path}")]
    EmptySource { path: PathBuf },

    /// A source document is not valid JSON
    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A source document parsed, but its top level is not an object
    #[error("{path} must contain a JSON object at the top level")]
    NotAnObject { path: PathBuf },

    /// Key export met a leaf that is not a string
    #[error("key '{path}' holds a {kind} value; exported keys must be strings or objects")]
    NonStringLeaf { path: String, kind: &'static str },

    /// Configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not a valid configuration document
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The filesystem notifier could not be created
    #[error("failed to initialize file watcher: {0}")]
    WatcherInit(#[source] notify::Error),

    /// A path could not be registered with the notifier
    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Directory walk failure
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A worker thread could not be started
    #[error("failed to spawn worker '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl FoldError {
    /// Whether this error means the process cannot keep running.
    ///
    /// Notifier creation and thread spawning are resource initialization
    /// failures; everything else only affects the current pass of one group.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FoldError::WatcherInit(_) | FoldError::Spawn { .. })
    }
}
