//! Verification record and authorization registry entries.

use crate::{ContentHash, QrId, RecordId, Timestamp, UserId, VerificationStatus};
use serde::{Deserialize, Serialize};

/// An entry in the authorization registry: a document number that the
/// issuing authority recognizes, with its document type.
///
/// Static administrative data; the pipeline only ever reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedDocument {
    pub doc_number: String,
    pub doc_type: String,
}

/// One verification attempt, persisted exactly once and never mutated.
///
/// Invariant: for a given document number at most one record carries
/// `status == Verified` together with a non-null QR id. The store backend
/// enforces this with a unique constraint; the orchestrator reuses the
/// existing record's artifacts on re-verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Generated per attempt.
    pub record_id: RecordId,
    /// Present only on verified records; globally unique when present.
    pub qr_id: Option<QrId>,
    /// Document type as claimed by the uploader.
    pub doc_type: String,
    /// Document number as claimed by the uploader.
    pub doc_number: String,
    /// Keccak-256 of the uploaded file bytes.
    pub file_hash: ContentHash,
    /// Ledger transaction that anchored `file_hash`, when one was made.
    pub transaction_id: Option<String>,
    /// Content-store identifier for the pinned file, when pinned.
    pub cid: Option<String>,
    pub status: VerificationStatus,
    /// The uploading user.
    pub user_id: UserId,
    pub submitted_at: Timestamp,
}

impl VerificationRecord {
    /// Whether this record represents a successful verification with an
    /// issued QR artifact.
    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified && self.qr_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: VerificationStatus, qr: Option<QrId>) -> VerificationRecord {
        VerificationRecord {
            record_id: RecordId::generate(),
            qr_id: qr,
            doc_type: "Passport".into(),
            doc_number: "AB123".into(),
            file_hash: ContentHash::new("0xdead"),
            transaction_id: None,
            cid: None,
            status,
            user_id: UserId::generate(),
            submitted_at: Timestamp::new(1_700_000_000),
        }
    }

    #[test]
    fn verified_requires_qr_id() {
        assert!(record(VerificationStatus::Verified, Some(QrId::generate())).is_verified());
        assert!(!record(VerificationStatus::Verified, None).is_verified());
        assert!(!record(VerificationStatus::Rejected, None).is_verified());
    }
}
