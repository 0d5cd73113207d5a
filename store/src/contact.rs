//! Contact message storage trait.

use crate::StoreError;
use veridoc_types::ContactMessage;

/// Append-only store of contact-form submissions.
pub trait ContactStore: Send + Sync {
    fn insert_message(&self, message: &ContactMessage) -> Result<(), StoreError>;
}
