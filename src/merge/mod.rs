//! JSON fragment merging
//!
//! - `tree`: deep merge over nested objects (last source wins at leaves)
//! - `source`: reads a group's explicit files and folders into one tree

mod source;
mod tree;

pub use source::{build_tree, merge_folder, read_source};
pub use tree::{deep_merge, with_subtree, Tree};
