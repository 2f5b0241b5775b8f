//! Key flattening for i18n key constants
//!
//! Every string leaf is replaced by its own dotted path, and the same path is
//! recorded in a flat lookup table. Leaves that are not strings are a
//! modeling error: exported keys must all be translation keys.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{FoldError, FoldResult};
use crate::merge::Tree;

/// Flat `path -> path` lookup table, sorted by path
pub type KeyTable = BTreeMap<String, String>;

/// Rewrite string leaves of `tree` to their dotted key path.
///
/// Returns the flat table of every rewritten path. Numbers, booleans, nulls
/// and arrays fail with [`FoldError::NonStringLeaf`]; the tree may be
/// partially rewritten when that happens.
pub fn flatten_keys(tree: &mut Tree) -> FoldResult<KeyTable> {
    let mut table = KeyTable::new();
    rewrite_level(tree, "", &mut table)?;
    Ok(table)
}

fn rewrite_level(tree: &mut Tree, parent: &str, table: &mut KeyTable) -> FoldResult<()> {
    for (key, value) in tree.iter_mut() {
        let path = if parent.is_empty() {
            key.clone()
        } else {
            format!("{parent}.{key}")
        };

        match value {
            Value::String(text) => {
                *text = path.clone();
                table.insert(path.clone(), path);
            }
            Value::Object(child) => rewrite_level(child, &path, table)?,
            other => {
                return Err(FoldError::NonStringLeaf {
                    path,
                    kind: value_kind(other),
                })
            }
        }
    }
    Ok(())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
