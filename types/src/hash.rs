//! Content hash newtype.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keccak-256 digest of an uploaded file's raw bytes, stored as
/// `0x`-prefixed lowercase hex.
///
/// This is the value anchored on the ledger and returned to callers for
/// diagnostics even when verification is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wrap a digest already rendered as hex.
    pub fn new(hex_string: impl Into<String>) -> Self {
        Self(hex_string.into())
    }

    /// Render a raw 32-byte digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(format!("0x{}", hex::encode(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_digest_renders_prefixed_hex() {
        let h = ContentHash::from_digest(&[0xab; 32]);
        assert!(h.as_str().starts_with("0xabab"));
        assert_eq!(h.as_str().len(), 2 + 64);
    }
}
