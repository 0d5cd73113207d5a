//! Verification record storage trait.

use crate::StoreError;
use veridoc_types::{QrId, UserId, VerificationRecord, VerificationStatus};

/// Durable, queryable store of verification attempts.
///
/// Records are append-only: inserted exactly once, never mutated or
/// deleted. The backend enforces two unique constraints so that
/// concurrent first-time verifications of the same document number are
/// safely detectable at insert time:
/// - at most one record per document number with status `Verified`;
/// - QR ids are globally unique.
pub trait RecordStore: Send + Sync {
    /// Append a verification record.
    ///
    /// Returns [`StoreError::Duplicate`] when the record would be the
    /// second Verified record for its document number or reuse an
    /// existing QR id. The caller treats that as "another request
    /// already won" and re-fetches the winner.
    fn insert_record(&self, record: &VerificationRecord) -> Result<(), StoreError>;

    /// Find the Verified record for a document number, if any.
    fn find_verified(&self, doc_number: &str) -> Result<Option<VerificationRecord>, StoreError>;

    /// Find a record by its QR id.
    fn find_by_qr(&self, qr_id: &QrId) -> Result<Option<VerificationRecord>, StoreError>;

    /// Count records submitted by a user, optionally filtered by status.
    fn count_for_user(
        &self,
        user_id: &UserId,
        status: Option<VerificationStatus>,
    ) -> Result<u64, StoreError>;
}
