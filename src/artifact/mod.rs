//! Derived artifacts for a merged tree
//!
//! - merged JSON document
//! - naive TypeScript interface stub (textual rewrite of the JSON)
//! - key export module (`export const i18nKeys = ...`)

mod keys;
mod writer;

pub use keys::{flatten_keys, KeyTable};
pub use writer::{
    render_json, render_key_export, render_ts_interface, write_artifacts, ArtifactReport,
};
