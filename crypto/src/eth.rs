//! Ethereum `personal_sign` recovery and EIP-55 address rendering.
//!
//! The disclosure gate never sees a public key: it receives a message and
//! a 65-byte signature produced by a wallet's `personal_sign`, recovers
//! the signing address, and compares it against stored addresses.

use crate::error::CryptoError;
use crate::hash::keccak_256;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use veridoc_types::EthAddress;

/// EIP-191 prefix applied by `personal_sign` before hashing.
const PERSONAL_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Hash a message the way `personal_sign` does: keccak-256 over the
/// EIP-191 prefix, the decimal byte length, and the message itself.
pub fn personal_message_hash(message: &str) -> [u8; 32] {
    let mut preimage = Vec::with_capacity(PERSONAL_PREFIX.len() + 24 + message.len());
    preimage.extend_from_slice(PERSONAL_PREFIX.as_bytes());
    preimage.extend_from_slice(message.len().to_string().as_bytes());
    preimage.extend_from_slice(message.as_bytes());
    keccak_256(&preimage)
}

/// Recover the signing address from a `personal_sign` signature.
///
/// `signature_hex` is the 65-byte r ‖ s ‖ v signature as produced by
/// wallets, hex-encoded with or without a `0x` prefix. `v` may be given
/// as 0/1 or in the legacy 27/28 form.
pub fn recover_address(message: &str, signature_hex: &str) -> Result<EthAddress, CryptoError> {
    let raw = hex::decode(signature_hex.trim_start_matches("0x"))
        .map_err(|_| CryptoError::SignatureHex)?;
    if raw.len() != 65 {
        return Err(CryptoError::SignatureLength(raw.len()));
    }

    let signature = Signature::from_slice(&raw[..64]).map_err(|_| CryptoError::Recovery)?;
    let v = match raw[64] {
        v @ 0..=3 => v,
        v @ 27..=30 => v - 27,
        v => return Err(CryptoError::RecoveryId(v)),
    };
    let recovery_id = RecoveryId::from_byte(v).ok_or(CryptoError::RecoveryId(v))?;

    let prehash = personal_message_hash(message);
    let key = VerifyingKey::recover_from_prehash(&prehash, &signature, recovery_id)
        .map_err(|_| CryptoError::Recovery)?;

    Ok(address_of(&key))
}

/// Derive the Ethereum address of a verifying key: the low 20 bytes of
/// keccak-256 over the uncompressed point (without the 0x04 tag).
pub fn address_of(key: &VerifyingKey) -> EthAddress {
    let point = key.to_encoded_point(false);
    let digest = keccak_256(&point.as_bytes()[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[12..]);
    EthAddress::from_bytes(bytes)
}

/// Render an address in EIP-55 checksummed form.
///
/// Each hex digit is uppercased when the corresponding nibble of
/// keccak-256(lowercase hex address) is >= 8.
pub fn checksummed(address: &EthAddress) -> String {
    let lower = hex::encode(address.as_bytes());
    let digest = keccak_256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            digest[i / 2] >> 4
        } else {
            digest[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    fn test_key() -> SigningKey {
        SigningKey::from_slice(&[7u8; 32]).unwrap()
    }

    /// Produce a wallet-shaped signature (65-byte hex, v in {27, 28}).
    fn personal_sign(message: &str, key: &SigningKey) -> String {
        let prehash = personal_message_hash(message);
        let (sig, recid) = key.sign_prehash_recoverable(&prehash).unwrap();
        let mut raw = sig.to_bytes().to_vec();
        raw.push(recid.to_byte() + 27);
        format!("0x{}", hex::encode(raw))
    }

    #[test]
    fn recovery_round_trip() {
        let key = test_key();
        let expected = address_of(key.verifying_key());

        let message = "Verify ownership of document ID: abc. Timestamp: 1700000000000";
        let signature = personal_sign(message, &key);

        let recovered = recover_address(message, &signature).unwrap();
        assert_eq!(recovered, expected);
    }

    #[test]
    fn tampered_message_recovers_different_address() {
        let key = test_key();
        let signature = personal_sign("original message", &key);

        let recovered = recover_address("tampered message", &signature).unwrap();
        assert_ne!(recovered, address_of(key.verifying_key()));
    }

    #[test]
    fn zero_based_v_accepted() {
        let key = test_key();
        let prehash = personal_message_hash("msg");
        let (sig, recid) = key.sign_prehash_recoverable(&prehash).unwrap();
        let mut raw = sig.to_bytes().to_vec();
        raw.push(recid.to_byte());
        let signature = hex::encode(raw);

        let recovered = recover_address("msg", &signature).unwrap();
        assert_eq!(recovered, address_of(key.verifying_key()));
    }

    #[test]
    fn truncated_signature_rejected() {
        let err = recover_address("msg", "0xdeadbeef").unwrap_err();
        assert!(matches!(err, CryptoError::SignatureLength(4)));
    }

    #[test]
    fn non_hex_signature_rejected() {
        let err = recover_address("msg", "not a signature").unwrap_err();
        assert!(matches!(err, CryptoError::SignatureHex));
    }

    #[test]
    fn eip55_reference_vectors() {
        // Test vectors published with EIP-55.
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let addr: EthAddress = expected.to_lowercase().parse().unwrap();
            assert_eq!(checksummed(&addr), expected);
        }
    }
}
