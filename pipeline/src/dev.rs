//! Deterministic in-process capabilities for local development.
//!
//! These let the whole stack run with no sidecar services: the
//! extractor reads the upload as text, and the pin/anchor stand-ins
//! derive stable identifiers from the content itself, so repeated runs
//! over the same file behave identically.

use crate::capability::{CapabilityError, ContentStore, LedgerAnchor, TextExtractor};
use async_trait::async_trait;
use veridoc_crypto::keccak_256;
use veridoc_types::ContentHash;

/// Treats the uploaded bytes as UTF-8 text. Useful with plain-text
/// "scans" in development; obviously not an OCR engine.
pub struct PassthroughExtractor;

#[async_trait]
impl TextExtractor for PassthroughExtractor {
    async fn extract_text(&self, image: &[u8]) -> Result<String, CapabilityError> {
        Ok(String::from_utf8_lossy(image).into_owned())
    }
}

/// Derives a stable pseudo-CID from the file digest.
pub struct LocalContentStore;

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn pin(&self, file: &[u8]) -> Result<String, CapabilityError> {
        let digest = keccak_256(file);
        Ok(format!("dev-cid-{}", hex::encode(&digest[..16])))
    }
}

/// Derives a stable pseudo-transaction id from the anchored digest.
pub struct LocalLedgerAnchor;

#[async_trait]
impl LedgerAnchor for LocalLedgerAnchor {
    async fn anchor(&self, digest: &ContentHash) -> Result<String, CapabilityError> {
        let tx = keccak_256(digest.as_str().as_bytes());
        Ok(format!("0x{}", hex::encode(tx)))
    }
}
