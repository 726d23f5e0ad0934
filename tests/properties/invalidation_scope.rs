//! Property tests for invalidation path scoping.

use proptest::prelude::*;

use sitefront::domain::services::InvalidationPlanner;
use sitefront::domain::value_objects::ObjectKey;

fn dir() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,8}").unwrap()
}

fn name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9]{1,8}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: HTML documents are invalidated by exact path.
    #[test]
    fn property_documents_use_exact_paths(dirs in proptest::collection::vec(dir(), 0..3), file in name()) {
        let mut parts = dirs;
        parts.push(format!("{file}.html"));
        let key = ObjectKey::parse(&parts.join("/")).unwrap();
        prop_assert_eq!(InvalidationPlanner::scope_for(&key), key.url_path());
    }

    /// PROPERTY: Nested assets are covered by their top-level directory wildcard.
    #[test]
    fn property_nested_assets_use_directory_wildcard(
        top in dir(),
        nested in proptest::collection::vec(dir(), 0..3),
        file in name(),
        ext in prop::sample::select(vec!["png", "css", "js", "svg", "woff2"]),
    ) {
        let mut parts = vec![top.clone()];
        parts.extend(nested);
        parts.push(format!("{file}.{ext}"));
        let key = ObjectKey::parse(&parts.join("/")).unwrap();

        let scope = InvalidationPlanner::scope_for(&key);
        prop_assert_eq!(&scope, &format!("/{top}/*"));
        prop_assert!(key.url_path().starts_with(scope.trim_end_matches('*')));
    }
}
