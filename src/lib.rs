//! jsonfold - watches JSON fragments and folds them into merged artifacts
//!
//! Each configured watch group merges a set of JSON files and folders into
//! one output document, optionally alongside a TypeScript interface stub and
//! a key export module. Groups rebuild after a debounce delay whenever their
//! sources change, and the whole group set restarts when the configuration
//! file changes.

pub mod artifact;
pub mod config;
pub mod error;
pub mod fs;
pub mod group;
pub mod lifecycle;
pub mod merge;
pub mod supervisor;
pub mod watcher;

// Re-exports for convenience
pub use artifact::{flatten_keys, write_artifacts, ArtifactReport, KeyTable};
pub use config::{Config, FolderMode, GroupSpec, KeyStrategy, WatchList};
pub use error::{FoldError, FoldResult};
pub use group::{merge_group, start_group, MergeOutcome, WatchGroup};
pub use lifecycle::{build_once, GroupBuild, Lifecycle};
pub use merge::{build_tree, deep_merge, Tree};
pub use supervisor::{CancelToken, Supervisor};
