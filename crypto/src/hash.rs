//! Keccak-256 hashing for uploaded documents.

use sha3::{Digest, Keccak256};
use veridoc_types::ContentHash;

/// Compute a 256-bit keccak hash of arbitrary data.
pub fn keccak_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash raw file bytes to the `ContentHash` stored on the verification
/// record and anchored on the ledger.
pub fn content_hash(file_bytes: &[u8]) -> ContentHash {
    ContentHash::from_digest(&keccak_256(file_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_deterministic() {
        assert_eq!(keccak_256(b"hello veridoc"), keccak_256(b"hello veridoc"));
    }

    #[test]
    fn keccak_known_vector_empty() {
        // keccak-256("") — well-known constant.
        assert_eq!(
            hex::encode(keccak_256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn content_hash_is_prefixed_hex() {
        let h = content_hash(b"some scanned document bytes");
        assert!(h.as_str().starts_with("0x"));
        assert_eq!(h.as_str().len(), 66);
    }

    #[test]
    fn different_files_different_hashes() {
        assert_ne!(content_hash(b"file a"), content_hash(b"file b"));
    }
}
