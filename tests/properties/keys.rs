//! Property tests for key flattening and the TypeScript stub.

use proptest::prelude::*;
use serde_json::Value;

use jsonfold::artifact::{render_json, render_ts_interface};
use jsonfold::flatten_keys;

use crate::strategies::{leaves, string_tree};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Each string leaf becomes its own path, and the table lists exactly those paths.
    #[test]
    fn property_flatten_rewrites_every_leaf(tree in string_tree()) {
        let original = leaves(&tree);
        let mut rewritten = tree.clone();
        let table = flatten_keys(&mut rewritten).unwrap();

        prop_assert_eq!(table.len(), original.len());
        for (path, value) in leaves(&rewritten) {
            prop_assert_eq!(&value, &Value::String(path.clone()));
            prop_assert_eq!(table.get(&path), Some(&path));
        }
    }

    /// PROPERTY: Flattening keeps the tree's shape.
    #[test]
    fn property_flatten_keeps_shape(tree in string_tree()) {
        let mut rewritten = tree.clone();
        flatten_keys(&mut rewritten).unwrap();

        prop_assert_eq!(
            leaves(&rewritten).keys().cloned().collect::<Vec<_>>(),
            leaves(&tree).keys().cloned().collect::<Vec<_>>()
        );
    }

    /// PROPERTY: The interface stub never keeps a string value.
    #[test]
    fn property_stub_has_no_string_values(tree in string_tree()) {
        let json = render_json(&tree).unwrap();
        let stub = render_ts_interface(&json, "Messages");

        prop_assert!(stub.starts_with("export interface Messages {"), "unexpected stub header: {}", stub);
        prop_assert!(!stub.contains(": \""), "string value left in {}", stub);
        prop_assert_eq!(stub.lines().count(), json.lines().count());
    }
}
