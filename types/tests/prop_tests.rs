use proptest::prelude::*;

use veridoc_types::{ContentHash, EthAddress, QrId, Timestamp};

proptest! {
    /// EthAddress roundtrip: bytes -> display -> parse produces the same address.
    #[test]
    fn address_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let addr = EthAddress::from_bytes(bytes);
        let parsed: EthAddress = addr.to_lower_hex().parse().unwrap();
        prop_assert_eq!(addr, parsed);
        prop_assert_eq!(parsed.as_bytes(), &bytes);
    }

    /// Parsing is case-insensitive over the hex body.
    #[test]
    fn address_parse_ignores_case(bytes in prop::array::uniform20(0u8..)) {
        let lower = EthAddress::from_bytes(bytes).to_lower_hex();
        let upper = format!("0x{}", lower[2..].to_uppercase());
        let a: EthAddress = lower.parse().unwrap();
        let b: EthAddress = upper.parse().unwrap();
        prop_assert_eq!(a, b);
    }

    /// Any 40-hex-char body without the 0x prefix is rejected.
    #[test]
    fn address_requires_prefix(bytes in prop::array::uniform20(0u8..)) {
        let bare = hex::encode(bytes);
        prop_assert!(bare.parse::<EthAddress>().is_err());
    }

    /// ContentHash renders a digest as 0x + 64 hex chars.
    #[test]
    fn content_hash_shape(digest in prop::array::uniform32(0u8..)) {
        let hash = ContentHash::from_digest(&digest);
        prop_assert!(hash.as_str().starts_with("0x"));
        prop_assert_eq!(hash.as_str().len(), 66);
        prop_assert!(hash.as_str()[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    /// Elapsed time never underflows, regardless of clock ordering.
    #[test]
    fn elapsed_never_underflows(a in any::<u64>(), b in any::<u64>()) {
        let earlier = Timestamp::new(a);
        let later = Timestamp::new(b);
        prop_assert_eq!(earlier.elapsed_since(later), b.saturating_sub(a));
    }

    /// Ids survive a serde round trip unchanged.
    #[test]
    fn id_serde_roundtrip(raw in "[a-z0-9-]{1,64}") {
        let id = QrId::new(raw.clone());
        let json = serde_json::to_string(&id).unwrap();
        let back: QrId = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(id, back);
        prop_assert_eq!(json, format!("\"{raw}\""));
    }
}
