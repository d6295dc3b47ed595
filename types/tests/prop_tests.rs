use proptest::prelude::*;

use devreg_types::{ContentHash, KeyDigest, VoteId};

proptest! {
    /// KeyDigest hex roundtrip: to_hex -> parse produces the identical digest.
    #[test]
    fn key_digest_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let digest = KeyDigest::new(bytes);
        let parsed: KeyDigest = digest.to_hex().parse().unwrap();
        prop_assert_eq!(parsed.as_bytes(), &bytes);
    }

    /// KeyDigest JSON form is always a 64-char lowercase hex string.
    #[test]
    fn key_digest_json_is_lowercase_hex(bytes in prop::array::uniform32(0u8..)) {
        let json = serde_json::to_string(&KeyDigest::new(bytes)).unwrap();
        let inner = json.trim_matches('"');
        prop_assert_eq!(inner.len(), 64);
        prop_assert!(inner.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Non-empty identifiers without NUL bytes always validate.
    #[test]
    fn printable_identifiers_validate(s in "[A-Za-z0-9]{1,64}") {
        prop_assert!(ContentHash::new(s.clone()).validate().is_ok());
        prop_assert!(VoteId::with_suffix(&s).validate().is_ok());
    }

    /// Any identifier containing NUL is rejected.
    #[test]
    fn nul_identifiers_rejected(a in "[a-z]{0,8}", b in "[a-z]{0,8}") {
        let s = format!("{a}\u{0}{b}");
        prop_assert!(ContentHash::new(s).validate().is_err());
    }
}
