//! Fundamental types shared across the Veridoc service.
//!
//! Identifiers, the Ethereum address newtype, timestamps, and the
//! persistent record shapes (users, authorized documents, verification
//! records). No business logic lives here — the pipeline and store
//! crates both depend on these types.

pub mod address;
pub mod hash;
pub mod id;
pub mod record;
pub mod status;
pub mod time;
pub mod user;

pub use address::{AddressError, EthAddress};
pub use hash::ContentHash;
pub use id::{QrId, RecordId, UserId};
pub use record::{AuthorizedDocument, VerificationRecord};
pub use status::VerificationStatus;
pub use time::Timestamp;
pub use user::{ContactMessage, User, UserSettings};
