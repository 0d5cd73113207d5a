//! Authorization registry storage trait.

use crate::StoreError;
use veridoc_types::AuthorizedDocument;

/// Lookup table mapping a document number to its authorized document
/// type. The pipeline only reads it; inserts exist for administrative
/// seeding.
pub trait AuthorizationStore: Send + Sync {
    /// Look up a document number in the registry.
    fn get_authorized(&self, doc_number: &str) -> Result<Option<AuthorizedDocument>, StoreError>;

    /// Add a registry entry. Duplicate document numbers are rejected.
    fn insert_authorized(&self, doc: &AuthorizedDocument) -> Result<(), StoreError>;
}
