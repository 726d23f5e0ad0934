//! Property tests for content fingerprints.

use proptest::prelude::*;

use sitefront::domain::value_objects::Fingerprint;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Fingerprints depend only on content.
    #[test]
    fn property_fingerprint_is_deterministic(content in proptest::collection::vec(any::<u8>(), 0..512)) {
        let a = Fingerprint::from_bytes(&content);
        let b = Fingerprint::from_bytes(&content.clone());
        prop_assert_eq!(&a, &b);
        prop_assert!(a.as_str().starts_with(Fingerprint::PREFIX));
        prop_assert_eq!(a.hex().len(), 64);
    }

    /// PROPERTY: Changing one byte changes the fingerprint.
    #[test]
    fn property_single_byte_change_is_detected(
        content in proptest::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
    ) {
        let mut edited = content.clone();
        let i = index.index(edited.len());
        edited[i] = edited[i].wrapping_add(1);
        prop_assert_ne!(Fingerprint::from_bytes(&content), Fingerprint::from_bytes(&edited));
    }

    /// PROPERTY: Prefixed and bare forms parse to the same fingerprint.
    #[test]
    fn property_fingerprint_parses_both_forms(content in proptest::collection::vec(any::<u8>(), 0..64)) {
        let fp = Fingerprint::from_bytes(&content);
        prop_assert_eq!(Fingerprint::new(fp.as_str()), fp.clone());
        prop_assert_eq!(Fingerprint::new(fp.hex()), fp);
    }
}
