//! Pipeline error taxonomy.

use thiserror::Error;
use veridoc_store::StoreError;

/// Every failure mode a verification or disclosure request can surface.
///
/// The API layer maps these one-to-one onto HTTP statuses
/// (400/401/403/404/503/500).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or malformed request fields. User-correctable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The signature does not prove control of the claimed address.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The prover controls *a* wallet, but not the document owner's.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Record or QR id absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required capability (the extraction worker) is not ready yet.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Unexpected failure in an external call or persistence step.
    /// Logged in full server-side; clients get a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => PipelineError::NotFound(key),
            // Unique-key conflicts are user-visible input problems
            // (duplicate email, wallet, QR id), never raw constraint errors.
            StoreError::Duplicate(key) => PipelineError::InvalidInput(format!("already exists: {key}")),
            StoreError::Backend(msg) => PipelineError::Internal(msg),
        }
    }
}
