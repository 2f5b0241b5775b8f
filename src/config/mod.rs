//! Configuration module for jsonfold
//!
//! The configuration is a JSON document (`config.json` by default) holding
//! the global debounce delay and the ordered list of watch groups. Every
//! load produces a fresh value; running groups keep the snapshot they were
//! started with.

mod loader;
mod types;

pub use loader::{parse_with_warnings, ConfigWarning};
pub use types::{
    Config, FolderMode, GroupSpec, KeyStrategy, WatchList, DEFAULT_DELAY_MICROS,
    DEFAULT_KEY_EXPORT_NAME, DEFAULT_SUFFIX,
};

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
