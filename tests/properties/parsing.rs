//! Property tests for source and config parsing.

use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;

use jsonfold::config::parse_with_warnings;
use jsonfold::merge::read_source;
use jsonfold::FoldError;

use crate::strategies::string_tree;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Reading arbitrary bytes as a source never panics.
    #[test]
    fn property_read_source_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("src.json");
        std::fs::write(&path, &bytes).unwrap();

        let result = read_source(&path);
        if bytes.is_empty() {
            prop_assert!(
                matches!(result, Err(FoldError::EmptySource { .. })),
                "expected an empty-source error, got {:?}",
                result
            );
        }
    }

    /// PROPERTY: A serialized object reads back as the same tree.
    #[test]
    fn property_read_source_accepts_objects(tree in string_tree()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("src.json");
        std::fs::write(&path, serde_json::to_vec(&tree).unwrap()).unwrap();

        prop_assert_eq!(read_source(&path).unwrap(), tree);
    }

    /// PROPERTY: Config parsing never panics on arbitrary input.
    #[test]
    fn property_parse_config_never_panics(content in "(?s).{0,256}") {
        let _ = parse_with_warnings(&content, Path::new("config.json"));
    }
}
