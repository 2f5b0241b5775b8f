//! Shared generators for merge trees.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use serde_json::Value;

use jsonfold::Tree;

fn key() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,4}").unwrap()
}

/// Trees whose leaves are all strings, the shape of a translation file
pub fn string_tree() -> impl Strategy<Value = Tree> {
    let leaf = proptest::string::string_regex("[A-Za-z0-9 ]{0,8}")
        .unwrap()
        .prop_map(Value::String);
    let value = leaf.prop_recursive(3, 24, 4, |inner| {
        proptest::collection::btree_map(key(), inner, 0..4)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    });
    proptest::collection::btree_map(key(), value, 0..5).prop_map(|m| m.into_iter().collect())
}

/// Every non-object value keyed by its dotted path
pub fn leaves(tree: &Tree) -> BTreeMap<String, Value> {
    fn walk(tree: &Tree, parent: &str, out: &mut BTreeMap<String, Value>) {
        for (key, value) in tree {
            let path = if parent.is_empty() {
                key.clone()
            } else {
                format!("{parent}.{key}")
            };
            match value {
                Value::Object(child) => walk(child, &path, out),
                other => {
                    out.insert(path, other.clone());
                }
            }
        }
    }

    let mut out = BTreeMap::new();
    walk(tree, "", &mut out);
    out
}

/// Dotted path of every node, objects included
pub fn paths(tree: &Tree) -> BTreeSet<String> {
    fn walk(tree: &Tree, parent: &str, out: &mut BTreeSet<String>) {
        for (key, value) in tree {
            let path = if parent.is_empty() {
                key.clone()
            } else {
                format!("{parent}.{key}")
            };
            if let Value::Object(child) = value {
                walk(child, &path, out);
            }
            out.insert(path);
        }
    }

    let mut out = BTreeSet::new();
    walk(tree, "", &mut out);
    out
}
