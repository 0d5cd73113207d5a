//! Verification orchestrator — drives OCR, text match, authorization,
//! content pinning, ledger anchoring, and QR issuance for one uploaded
//! document, with an idempotency short-circuit for already-verified
//! document numbers.

use crate::capability::{CapabilityError, ContentStore, LedgerAnchor};
use crate::error::PipelineError;
use crate::extraction::ExtractionHandle;
use crate::qr::QrArtifact;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};
use veridoc_crypto::content_hash;
use veridoc_store::{AuthorizationStore, RecordStore, StoreError};
use veridoc_types::{
    ContentHash, RecordId, Timestamp, UserId, VerificationRecord, VerificationStatus,
};

/// Human message returned on a successful verification.
const VERIFIED_MESSAGE: &str = "Document Found and Verified!";
/// Human message returned on a rejected verification.
const REJECTED_MESSAGE: &str = "Document not found or invalid.";

/// One upload: the claimed metadata plus the raw file bytes.
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    pub doc_type: String,
    pub doc_number: String,
    pub file: Vec<u8>,
}

/// What a verification attempt produced.
///
/// On `Rejected`, every external artifact is `None` and only the file
/// hash is populated (diagnostics).
#[derive(Clone, Debug)]
pub struct VerificationOutcome {
    pub status: VerificationStatus,
    pub message: String,
    pub file_hash: ContentHash,
    pub transaction_id: Option<String>,
    pub cid: Option<String>,
    pub qr: Option<QrArtifact>,
}

/// Drives the verification pipeline. One instance is shared by all
/// requests; every capability behind it is long-lived.
pub struct VerificationOrchestrator {
    records: Arc<dyn RecordStore>,
    registry: Arc<dyn AuthorizationStore>,
    extraction: ExtractionHandle,
    content_store: Arc<dyn ContentStore>,
    ledger: Arc<dyn LedgerAnchor>,
    /// Base URL embedded in issued QR links.
    base_url: String,
    /// Bound on each external capability call.
    call_timeout: Duration,
}

impl VerificationOrchestrator {
    pub fn new(
        records: Arc<dyn RecordStore>,
        registry: Arc<dyn AuthorizationStore>,
        extraction: ExtractionHandle,
        content_store: Arc<dyn ContentStore>,
        ledger: Arc<dyn LedgerAnchor>,
        base_url: String,
        call_timeout: Duration,
    ) -> Self {
        Self {
            records,
            registry,
            extraction,
            content_store,
            ledger,
            base_url,
            call_timeout,
        }
    }

    /// Whether the extraction worker can serve requests.
    pub fn extraction_ready(&self) -> bool {
        self.extraction.is_ready()
    }

    /// Run the full pipeline for one upload.
    ///
    /// Persists exactly one `VerificationRecord` per invocation, except
    /// on the idempotent-reuse path, which persists nothing.
    pub async fn verify(
        &self,
        user_id: &UserId,
        request: VerificationRequest,
    ) -> Result<VerificationOutcome, PipelineError> {
        let doc_type = request.doc_type.trim();
        let doc_number = request.doc_number.trim();
        if doc_type.is_empty() || doc_number.is_empty() {
            return Err(PipelineError::InvalidInput(
                "docType and docNumber are required".into(),
            ));
        }
        if request.file.is_empty() {
            return Err(PipelineError::InvalidInput(
                "a document file is required".into(),
            ));
        }

        // Step 1: idempotency. A document number that already has a
        // Verified record returns the stored artifacts; only the QR
        // image is re-rendered (it is never persisted).
        if let Some(existing) = self.records.find_verified(doc_number)? {
            info!(doc_number, "reusing existing verified record");
            return self.reuse_outcome(existing);
        }

        // Step 2: OCR + content hash. The worker rejects immediately
        // with ServiceUnavailable while its engine is starting.
        let extracted = self
            .bounded("text extraction", self.extraction.extract(request.file.clone()))
            .await??;
        let file_hash = content_hash(&request.file);

        // Step 3: exact, case-sensitive substring match.
        let text_matched = extracted.contains(doc_number);

        // Step 4: authorization registry lookup, only after a match.
        let authorized = if text_matched {
            self.registry.get_authorized(doc_number)?.is_some()
        } else {
            false
        };

        // Steps 5–6: pin first, anchor only with a CID in hand. Either
        // capability declining downgrades the outcome to Rejected;
        // transport failures abort the request.
        let mut cid = None;
        let mut transaction_id = None;
        if text_matched && authorized {
            cid = self
                .absorb_declined(
                    "content store",
                    self.bounded("content store", self.content_store.pin(&request.file))
                        .await?,
                )?;

            if cid.is_some() {
                transaction_id = self
                    .absorb_declined(
                        "ledger anchor",
                        self.bounded("ledger anchor", self.ledger.anchor(&file_hash))
                            .await?,
                    )?;
            }
        }

        let verified = text_matched && authorized && cid.is_some() && transaction_id.is_some();
        if verified {
            self.persist_verified(user_id, doc_type, doc_number, file_hash, transaction_id, cid)
        } else {
            self.persist_rejected(
                user_id,
                doc_type,
                doc_number,
                file_hash,
                text_matched,
                authorized,
            )
        }
    }

    /// Build the outcome for an existing verified record without
    /// re-running the pipeline or minting new artifacts.
    fn reuse_outcome(
        &self,
        record: VerificationRecord,
    ) -> Result<VerificationOutcome, PipelineError> {
        let qr_id = record.qr_id.ok_or_else(|| {
            PipelineError::Internal("verified record is missing its QR id".into())
        })?;
        let qr = QrArtifact::for_id(&self.base_url, qr_id)?;
        Ok(VerificationOutcome {
            status: VerificationStatus::Verified,
            message: VERIFIED_MESSAGE.into(),
            file_hash: record.file_hash,
            transaction_id: record.transaction_id,
            cid: record.cid,
            qr: Some(qr),
        })
    }

    fn persist_verified(
        &self,
        user_id: &UserId,
        doc_type: &str,
        doc_number: &str,
        file_hash: ContentHash,
        transaction_id: Option<String>,
        cid: Option<String>,
    ) -> Result<VerificationOutcome, PipelineError> {
        let qr = QrArtifact::issue(&self.base_url)?;
        let record = VerificationRecord {
            record_id: RecordId::generate(),
            qr_id: Some(qr.qr_id.clone()),
            doc_type: doc_type.into(),
            doc_number: doc_number.into(),
            file_hash: file_hash.clone(),
            transaction_id: transaction_id.clone(),
            cid: cid.clone(),
            status: VerificationStatus::Verified,
            user_id: user_id.clone(),
            submitted_at: Timestamp::now(),
        };

        match self.records.insert_record(&record) {
            Ok(()) => {
                info!(doc_number, qr_id = %qr.qr_id, "document verified");
                Ok(VerificationOutcome {
                    status: VerificationStatus::Verified,
                    message: VERIFIED_MESSAGE.into(),
                    file_hash,
                    transaction_id,
                    cid,
                    qr: Some(qr),
                })
            }
            // A concurrent request for the same document number committed
            // first. Drop our artifacts and return the winner's.
            Err(StoreError::Duplicate(_)) => {
                warn!(doc_number, "lost verification insert race, reusing winner");
                let winner = self.records.find_verified(doc_number)?.ok_or_else(|| {
                    PipelineError::Internal(
                        "verified record vanished after duplicate insert".into(),
                    )
                })?;
                self.reuse_outcome(winner)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn persist_rejected(
        &self,
        user_id: &UserId,
        doc_type: &str,
        doc_number: &str,
        file_hash: ContentHash,
        text_matched: bool,
        authorized: bool,
    ) -> Result<VerificationOutcome, PipelineError> {
        info!(doc_number, text_matched, authorized, "document rejected");
        let record = VerificationRecord {
            record_id: RecordId::generate(),
            qr_id: None,
            doc_type: doc_type.into(),
            doc_number: doc_number.into(),
            file_hash: file_hash.clone(),
            transaction_id: None,
            cid: None,
            status: VerificationStatus::Rejected,
            user_id: user_id.clone(),
            submitted_at: Timestamp::now(),
        };
        self.records.insert_record(&record)?;

        Ok(VerificationOutcome {
            status: VerificationStatus::Rejected,
            message: REJECTED_MESSAGE.into(),
            file_hash,
            transaction_id: None,
            cid: None,
            qr: None,
        })
    }

    /// Wrap an external call in the configured timeout.
    async fn bounded<T>(
        &self,
        what: &str,
        fut: impl std::future::Future<Output = T>,
    ) -> Result<T, PipelineError> {
        timeout(self.call_timeout, fut)
            .await
            .map_err(|_| PipelineError::Internal(format!("{what} timed out")))
    }

    /// A declined capability becomes `None` (→ Rejected outcome); a
    /// transport failure propagates as an internal error.
    fn absorb_declined(
        &self,
        what: &str,
        result: Result<String, CapabilityError>,
    ) -> Result<Option<String>, PipelineError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(CapabilityError::Declined(reason)) => {
                warn!("{what} declined: {reason}");
                Ok(None)
            }
            Err(CapabilityError::Transport(reason)) => {
                Err(PipelineError::Internal(format!("{what} failed: {reason}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::TextExtractor;
    use crate::extraction::ExtractionWorker;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use veridoc_store_memory::MemoryStore;
    use veridoc_types::AuthorizedDocument;

    const BASE_URL: &str = "https://veridoc.example";

    struct FixedText(String);

    #[async_trait]
    impl TextExtractor for FixedText {
        async fn extract_text(&self, _image: &[u8]) -> Result<String, CapabilityError> {
            Ok(self.0.clone())
        }
    }

    /// Counts pins; optionally declines or fails.
    #[derive(Default)]
    struct CountingPin {
        calls: AtomicU64,
        mode: PinMode,
    }

    #[derive(Default, Clone, Copy)]
    enum PinMode {
        #[default]
        Ok,
        Declined,
        Transport,
    }

    #[async_trait]
    impl ContentStore for CountingPin {
        async fn pin(&self, file: &[u8]) -> Result<String, CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                PinMode::Ok => Ok(format!("bafy-{}", file.len())),
                PinMode::Declined => Err(CapabilityError::Declined("quota exceeded".into())),
                PinMode::Transport => Err(CapabilityError::Transport("connection reset".into())),
            }
        }
    }

    #[derive(Default)]
    struct CountingAnchor {
        calls: AtomicU64,
    }

    #[async_trait]
    impl LedgerAnchor for CountingAnchor {
        async fn anchor(&self, digest: &ContentHash) -> Result<String, CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("0xtx-{}", &digest.as_str()[2..10]))
        }
    }

    struct Harness {
        orchestrator: VerificationOrchestrator,
        store: Arc<MemoryStore>,
        pin: Arc<CountingPin>,
        anchor: Arc<CountingAnchor>,
    }

    async fn harness(extracted_text: &str, pin_mode: PinMode) -> Harness {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_authorized(&AuthorizedDocument {
                doc_number: "AB123".into(),
                doc_type: "Passport".into(),
            })
            .unwrap();

        let text = extracted_text.to_string();
        let extraction = ExtractionWorker::spawn(move || async move {
            Ok(Box::new(FixedText(text)) as Box<dyn TextExtractor>)
        });
        // Wait for the worker to come up.
        for _ in 0..100 {
            if extraction.is_ready() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let pin = Arc::new(CountingPin {
            calls: AtomicU64::new(0),
            mode: pin_mode,
        });
        let anchor = Arc::new(CountingAnchor::default());

        let orchestrator = VerificationOrchestrator::new(
            store.clone(),
            store.clone(),
            extraction,
            pin.clone(),
            anchor.clone(),
            BASE_URL.into(),
            Duration::from_secs(5),
        );

        Harness {
            orchestrator,
            store,
            pin,
            anchor,
        }
    }

    fn request(doc_number: &str) -> VerificationRequest {
        VerificationRequest {
            doc_type: "Passport".into(),
            doc_number: doc_number.into(),
            file: b"scanned page bytes".to_vec(),
        }
    }

    #[tokio::test]
    async fn authorized_match_is_verified_with_all_artifacts() {
        let h = harness("issued to holder ...AB123... valid", PinMode::Ok).await;
        let user = UserId::generate();

        let outcome = h.orchestrator.verify(&user, request("AB123")).await.unwrap();

        assert_eq!(outcome.status, VerificationStatus::Verified);
        assert_eq!(outcome.file_hash, content_hash(b"scanned page bytes"));
        assert!(outcome.cid.is_some());
        assert!(outcome.transaction_id.is_some());
        let qr = outcome.qr.expect("QR issued");
        assert!(qr.link.starts_with("https://veridoc.example/verify-qr?id="));

        // Exactly one record persisted, retrievable both ways.
        let stored = h.store.find_verified("AB123").unwrap().unwrap();
        assert_eq!(stored.qr_id, Some(qr.qr_id.clone()));
        assert_eq!(h.store.find_by_qr(&qr.qr_id).unwrap().unwrap(), stored);
    }

    #[tokio::test]
    async fn no_text_match_is_rejected_with_hash_only() {
        let h = harness("XYZ", PinMode::Ok).await;
        let user = UserId::generate();

        let outcome = h.orchestrator.verify(&user, request("AB123")).await.unwrap();

        assert_eq!(outcome.status, VerificationStatus::Rejected);
        assert_eq!(outcome.file_hash, content_hash(b"scanned page bytes"));
        assert!(outcome.cid.is_none());
        assert!(outcome.transaction_id.is_none());
        assert!(outcome.qr.is_none());

        // No expensive calls were made.
        assert_eq!(h.pin.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.anchor.calls.load(Ordering::SeqCst), 0);

        // A Rejected record was still persisted.
        assert_eq!(h.store.count_for_user(&user, None).unwrap(), 1);
        assert!(h.store.find_verified("AB123").unwrap().is_none());
    }

    #[tokio::test]
    async fn unauthorized_number_is_rejected() {
        let h = harness("contains CD456 here", PinMode::Ok).await;
        let outcome = h
            .orchestrator
            .verify(&UserId::generate(), request("CD456"))
            .await
            .unwrap();

        assert_eq!(outcome.status, VerificationStatus::Rejected);
        assert_eq!(h.pin.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn text_match_is_case_sensitive() {
        let h = harness("holder ab123 lower-cased", PinMode::Ok).await;
        let outcome = h
            .orchestrator
            .verify(&UserId::generate(), request("AB123"))
            .await
            .unwrap();
        assert_eq!(outcome.status, VerificationStatus::Rejected);
    }

    #[tokio::test]
    async fn pin_decline_downgrades_to_rejected_and_skips_anchor() {
        let h = harness("...AB123...", PinMode::Declined).await;
        let outcome = h
            .orchestrator
            .verify(&UserId::generate(), request("AB123"))
            .await
            .unwrap();

        assert_eq!(outcome.status, VerificationStatus::Rejected);
        assert!(outcome.cid.is_none());
        // No CID, so the ledger must never have been called.
        assert_eq!(h.anchor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pin_transport_failure_is_internal_error() {
        let h = harness("...AB123...", PinMode::Transport).await;
        let err = h
            .orchestrator
            .verify(&UserId::generate(), request("AB123"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Internal(_)));
    }

    #[tokio::test]
    async fn reverification_reuses_artifacts_without_new_side_effects() {
        let h = harness("...AB123...", PinMode::Ok).await;
        let user = UserId::generate();

        let first = h.orchestrator.verify(&user, request("AB123")).await.unwrap();
        let second = h.orchestrator.verify(&user, request("AB123")).await.unwrap();

        assert_eq!(second.status, VerificationStatus::Verified);
        assert_eq!(second.file_hash, first.file_hash);
        assert_eq!(second.transaction_id, first.transaction_id);
        assert_eq!(second.cid, first.cid);

        let first_qr = first.qr.unwrap();
        let second_qr = second.qr.unwrap();
        assert_eq!(second_qr.qr_id, first_qr.qr_id);
        assert_eq!(second_qr.link, first_qr.link);

        // One pin, one anchor, one persisted record total.
        assert_eq!(h.pin.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.anchor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.store.count_for_user(&user, None).unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_fields_and_empty_file_are_invalid_input() {
        let h = harness("...AB123...", PinMode::Ok).await;
        let user = UserId::generate();

        let mut no_number = request("  ");
        no_number.doc_number = "  ".into();
        let err = h.orchestrator.verify(&user, no_number).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));

        let mut empty_file = request("AB123");
        empty_file.file.clear();
        let err = h.orchestrator.verify(&user, empty_file).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn lost_insert_race_returns_winner_artifacts() {
        let h = harness("...AB123...", PinMode::Ok).await;
        let user = UserId::generate();

        // Simulate a concurrent request committing first: a Verified
        // record for the same number lands after our idempotency check
        // would have run, so our own insert hits the unique constraint.
        let winner_qr = QrArtifact::issue(BASE_URL).unwrap();
        let winner = VerificationRecord {
            record_id: RecordId::generate(),
            qr_id: Some(winner_qr.qr_id.clone()),
            doc_type: "Passport".into(),
            doc_number: "AB123".into(),
            file_hash: content_hash(b"racing upload"),
            transaction_id: Some("0xwinner".into()),
            cid: Some("bafy-winner".into()),
            status: VerificationStatus::Verified,
            user_id: user.clone(),
            submitted_at: Timestamp::now(),
        };
        h.store.insert_record(&winner).unwrap();

        let outcome = h
            .orchestrator
            .persist_verified(
                &user,
                "Passport",
                "AB123",
                content_hash(b"loser upload"),
                Some("0xloser".into()),
                Some("bafy-loser".into()),
            )
            .unwrap();

        // The loser's artifacts are dropped; the winner's come back.
        assert_eq!(outcome.status, VerificationStatus::Verified);
        assert_eq!(outcome.file_hash, content_hash(b"racing upload"));
        assert_eq!(outcome.transaction_id, Some("0xwinner".into()));
        assert_eq!(outcome.cid, Some("bafy-winner".into()));
        assert_eq!(outcome.qr.unwrap().qr_id, winner_qr.qr_id);

        // Only the winner's record exists.
        assert_eq!(h.store.count_for_user(&user, None).unwrap(), 1);
    }
}
