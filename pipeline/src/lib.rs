//! The Veridoc verification pipeline.
//!
//! One verification request flows through:
//! 1. **Idempotency check** — an already-verified document number returns
//!    its stored artifacts without re-running anything.
//! 2. **Text extraction** — OCR via a long-lived shared worker.
//! 3. **Text match** — the claimed number must appear verbatim in the
//!    extracted text.
//! 4. **Authorization lookup** — the number must be in the registry.
//! 5. **Content-addressed pin** — must yield a CID before any anchoring.
//! 6. **Ledger anchor** — records the file's keccak-256 digest.
//! 7. **QR issuance** — a unique token wrapped in a scannable link.
//!
//! Separately, the [`DisclosureGate`] releases the full record to a
//! caller who proves control of the uploader's linked wallet with an
//! EIP-191 signature.

pub mod capability;
pub mod dev;
pub mod disclosure;
pub mod error;
pub mod extraction;
pub mod orchestrator;
pub mod qr;
pub mod remote;

pub use capability::{CapabilityError, ContentStore, LedgerAnchor, TextExtractor};
pub use disclosure::{Disclosure, DisclosureGate, DisclosureRequest};
pub use error::PipelineError;
pub use extraction::{ExtractionHandle, ExtractionWorker};
pub use orchestrator::{VerificationOrchestrator, VerificationOutcome, VerificationRequest};
pub use qr::QrArtifact;
