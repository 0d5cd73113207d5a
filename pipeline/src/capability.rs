//! External capability interfaces.
//!
//! The pipeline drives three slow, network-bound collaborators. Each is
//! abstract here; concrete HTTP adapters live in [`crate::remote`] and
//! deterministic stand-ins for local development in [`crate::dev`].

use async_trait::async_trait;
use thiserror::Error;
use veridoc_types::ContentHash;

/// How a capability call failed.
///
/// The distinction matters to the orchestrator: a `Declined` pin or
/// anchor downgrades the outcome to Rejected, while a `Transport`
/// failure aborts the request as an internal error.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The provider answered but could not produce a result.
    #[error("capability declined: {0}")]
    Declined(String),

    /// Could not reach the provider, or it failed outright.
    #[error("capability transport failure: {0}")]
    Transport(String),
}

/// Produces recognized text from a document image.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, image: &[u8]) -> Result<String, CapabilityError>;
}

/// Durably stores a file and returns its content identifier (CID).
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn pin(&self, file: &[u8]) -> Result<String, CapabilityError>;
}

/// Submits a signed transaction recording a digest, returning the
/// transaction identifier.
#[async_trait]
pub trait LedgerAnchor: Send + Sync {
    async fn anchor(&self, digest: &ContentHash) -> Result<String, CapabilityError>;
}
