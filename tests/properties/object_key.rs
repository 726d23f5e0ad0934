//! Property tests for object key derivation.

use proptest::prelude::*;

use sitefront::domain::value_objects::{KeyError, ObjectKey};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_-]{1,12}(\\.[a-z]{1,4})?")
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Keys join plain segments with forward slashes.
    #[test]
    fn property_key_joins_segments(segments in proptest::collection::vec(segment(), 1..5)) {
        let joined = segments.join("/");
        let key = ObjectKey::parse(&joined).unwrap();
        prop_assert_eq!(key.as_str(), joined.as_str());
        prop_assert_eq!(key.url_path(), format!("/{joined}"));
        prop_assert_eq!(key.top_level_dir().is_some(), segments.len() > 1);
    }

    /// PROPERTY: `.` segments are dropped and never change the key.
    #[test]
    fn property_current_dir_segments_are_ignored(segments in proptest::collection::vec(segment(), 1..4)) {
        let plain = segments.join("/");
        let dotted = format!("./{}", segments.join("/./"));
        prop_assert_eq!(ObjectKey::parse(&plain).unwrap(), ObjectKey::parse(&dotted).unwrap());
    }

    /// PROPERTY: Any traversal segment is rejected.
    #[test]
    fn property_traversal_is_rejected(
        before in proptest::collection::vec(segment(), 0..3),
        after in proptest::collection::vec(segment(), 0..3),
    ) {
        let mut parts = before;
        parts.push("..".to_string());
        parts.extend(after);
        prop_assert_eq!(ObjectKey::parse(&parts.join("/")), Err(KeyError::ContainsTraversal));
    }

    /// PROPERTY: Parsing never panics.
    #[test]
    fn property_parse_never_panics(raw in "(?s).{0,64}") {
        let _ = ObjectKey::parse(&raw);
    }
}
