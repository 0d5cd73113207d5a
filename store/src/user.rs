//! User identity storage trait.

use crate::StoreError;
use veridoc_types::{EthAddress, User, UserId};

/// Trait for storing registered users.
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// Fails with [`StoreError::Duplicate`] if the email is already
    /// registered.
    fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    /// Get a user by id.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>, StoreError>;

    /// Get a user by unique email.
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Update the mutable profile fields (name, email, phone).
    ///
    /// Fails with [`StoreError::Duplicate`] if the new email belongs to
    /// another user, [`StoreError::NotFound`] if the user does not exist.
    fn update_profile(
        &self,
        user_id: &UserId,
        full_name: String,
        email: String,
        phone: Option<String>,
    ) -> Result<(), StoreError>;

    /// Link a wallet address to a user.
    ///
    /// A wallet is linked at most once per user and is unique across all
    /// users; violating either returns [`StoreError::Duplicate`].
    fn link_wallet(&self, user_id: &UserId, address: EthAddress) -> Result<(), StoreError>;
}
