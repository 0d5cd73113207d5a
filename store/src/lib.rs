//! Abstract storage traits for the Veridoc service.
//!
//! Every storage backend (the in-memory store shipped today, a SQL or
//! document database later) implements these traits. The pipeline and
//! API crates depend only on the traits.
//!
//! Unique-key discipline: inserts that would violate a uniqueness
//! invariant (email, wallet address, QR id, one Verified record per
//! document number) return [`StoreError::Duplicate`] rather than
//! overwriting. Callers rely on this to detect insert races.

pub mod authorization;
pub mod contact;
pub mod error;
pub mod record;
pub mod settings;
pub mod user;

pub use authorization::AuthorizationStore;
pub use contact::ContactStore;
pub use error::StoreError;
pub use record::RecordStore;
pub use settings::SettingsStore;
pub use user::UserStore;
