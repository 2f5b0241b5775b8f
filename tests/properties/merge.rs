//! Property tests for deep merge.

use proptest::prelude::*;

use jsonfold::{deep_merge, Tree};

use crate::strategies::{leaves, paths, string_tree};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every leaf of the later document survives the merge unchanged.
    #[test]
    fn property_later_source_wins(dst in string_tree(), src in string_tree()) {
        let mut merged = dst.clone();
        deep_merge(&mut merged, src.clone());

        let merged_leaves = leaves(&merged);
        for (path, value) in leaves(&src) {
            prop_assert_eq!(merged_leaves.get(&path), Some(&value), "leaf {} lost", path);
        }
    }

    /// PROPERTY: Top-level keys of the result are the union of both inputs.
    #[test]
    fn property_top_level_keys_are_union(dst in string_tree(), src in string_tree()) {
        let mut expected: Vec<String> = dst.keys().chain(src.keys()).cloned().collect();
        expected.sort();
        expected.dedup();

        let mut merged = dst;
        deep_merge(&mut merged, src);

        prop_assert_eq!(merged.keys().cloned().collect::<Vec<_>>(), expected);
    }

    /// PROPERTY: Merging a document into itself, or merging an empty one, changes nothing.
    #[test]
    fn property_merge_identities(tree in string_tree()) {
        let mut with_self = tree.clone();
        deep_merge(&mut with_self, tree.clone());
        prop_assert_eq!(&with_self, &tree);

        let mut with_empty = tree.clone();
        deep_merge(&mut with_empty, Tree::new());
        prop_assert_eq!(&with_empty, &tree);

        let mut into_empty = Tree::new();
        deep_merge(&mut into_empty, tree.clone());
        prop_assert_eq!(&into_empty, &tree);
    }

    /// PROPERTY: Leaves of the earlier document are kept unless the later one
    /// holds anything on the same path or a leaf on one of its prefixes.
    #[test]
    fn property_untouched_leaves_survive(dst in string_tree(), src in string_tree()) {
        let src_leaves = leaves(&src);
        let src_paths = paths(&src);
        let mut merged = dst.clone();
        deep_merge(&mut merged, src);
        let merged_leaves = leaves(&merged);

        for (path, value) in leaves(&dst) {
            let shadowed = src_paths.contains(&path)
                || src_leaves.keys().any(|p| path.starts_with(&format!("{p}.")));
            if !shadowed {
                prop_assert_eq!(merged_leaves.get(&path), Some(&value), "leaf {} dropped", path);
            }
        }
    }
}
