//! In-process storage backend for the Veridoc service.
//!
//! Implements all storage traits from `veridoc-store` over guarded hash
//! maps. Uniqueness invariants (email, wallet address, QR id, one
//! Verified record per document number) are enforced at insert time
//! under a single write lock, so concurrent inserts race safely: exactly
//! one wins and the rest observe [`StoreError::Duplicate`].

mod authorization;
mod contact;
mod record;
mod settings;
mod user;

use std::collections::HashMap;
use std::sync::RwLock;

use veridoc_store::StoreError;
use veridoc_types::{
    AuthorizedDocument, ContactMessage, EthAddress, QrId, User, UserId, UserSettings,
    VerificationRecord,
};

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, User>,
    /// Unique index: email -> user.
    email_index: HashMap<String, UserId>,
    /// Unique index: linked wallet -> user.
    wallet_index: HashMap<EthAddress, UserId>,
    authorized: HashMap<String, AuthorizedDocument>,
    /// Append-only record log.
    records: Vec<VerificationRecord>,
    /// Unique index: QR id -> position in `records`.
    qr_index: HashMap<QrId, usize>,
    /// Unique index: document number -> position of its Verified record.
    verified_index: HashMap<String, usize>,
    settings: HashMap<UserId, UserSettings>,
    messages: Vec<ContactMessage>,
}

/// The in-memory backend. One instance implements every store trait;
/// hand out `Arc<MemoryStore>` clones to each consumer.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }
}
