use crate::MemoryStore;
use veridoc_store::{RecordStore, StoreError};
use veridoc_types::{QrId, UserId, VerificationRecord, VerificationStatus};

impl RecordStore for MemoryStore {
    fn insert_record(&self, record: &VerificationRecord) -> Result<(), StoreError> {
        let mut inner = self.write()?;

        // Both unique checks happen under the same write lock that
        // performs the append, so a racing insert cannot slip between
        // check and commit.
        if record.status == VerificationStatus::Verified
            && inner.verified_index.contains_key(&record.doc_number)
        {
            return Err(StoreError::Duplicate(format!(
                "verified record for document number {}",
                record.doc_number
            )));
        }
        if let Some(qr_id) = &record.qr_id {
            if inner.qr_index.contains_key(qr_id) {
                return Err(StoreError::Duplicate(format!("qr id {qr_id}")));
            }
        }

        let position = inner.records.len();
        if record.status == VerificationStatus::Verified {
            inner
                .verified_index
                .insert(record.doc_number.clone(), position);
        }
        if let Some(qr_id) = &record.qr_id {
            inner.qr_index.insert(qr_id.clone(), position);
        }
        inner.records.push(record.clone());
        Ok(())
    }

    fn find_verified(&self, doc_number: &str) -> Result<Option<VerificationRecord>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .verified_index
            .get(doc_number)
            .map(|&pos| inner.records[pos].clone()))
    }

    fn find_by_qr(&self, qr_id: &QrId) -> Result<Option<VerificationRecord>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .qr_index
            .get(qr_id)
            .map(|&pos| inner.records[pos].clone()))
    }

    fn count_for_user(
        &self,
        user_id: &UserId,
        status: Option<VerificationStatus>,
    ) -> Result<u64, StoreError> {
        let inner = self.read()?;
        let count = inner
            .records
            .iter()
            .filter(|r| &r.user_id == user_id)
            .filter(|r| status.is_none_or(|s| r.status == s))
            .count();
        Ok(count as u64)
    }
}
