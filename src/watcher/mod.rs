//! Filesystem watching for merge groups
//!
//! - `event`: which notifications count as a change
//! - `recursive`: registers a root and all of its subdirectories
//! - `debounce`: collapses bursts of changes into one rebuild

mod debounce;
mod event;
mod recursive;

pub use debounce::Debouncer;
pub use event::{Change, ChangeKind};
pub use recursive::{watch_one, watch_tree};
