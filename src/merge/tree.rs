//! Deep merge over nested JSON objects
//!
//! The merged tree is a plain `serde_json` object map, so "is this a nested
//! tree" is a pattern match on `Value::Object` rather than a runtime check.

use serde_json::{Map, Value};

/// An associative tree of JSON values, keyed by string
pub type Tree = Map<String, Value>;

/// Merge `src` into `dst` in place and return `dst`.
///
/// - keys missing from `dst` are inserted as-is
/// - keys holding objects on both sides are merged recursively
/// - any other collision is won by `src`, with no type check
///
/// Keys are never removed.
pub fn deep_merge(dst: &mut Tree, src: Tree) -> &mut Tree {
    for (key, src_val) in src {
        match src_val {
            Value::Object(src_map) => match dst.get_mut(&key) {
                Some(Value::Object(dst_map)) => {
                    deep_merge(dst_map, src_map);
                }
                _ => {
                    dst.insert(key, Value::Object(src_map));
                }
            },
            other => {
                dst.insert(key, other);
            }
        }
    }
    dst
}

/// Run `f` on the sub-tree stored under `key`, creating it when absent.
///
/// A non-object value already stored under `key` is replaced by an empty tree.
pub fn with_subtree<R>(parent: &mut Tree, key: &str, f: impl FnOnce(&mut Tree) -> R) -> R {
    let mut child = match parent.remove(key) {
        Some(Value::Object(map)) => map,
        _ => Tree::new(),
    };
    let result = f(&mut child);
    parent.insert(key.to_string(), Value::Object(child));
    result
}
