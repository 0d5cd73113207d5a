//! User settings storage trait.

use crate::StoreError;
use veridoc_types::{UserId, UserSettings};

/// Per-user notification settings, one row per user.
pub trait SettingsStore: Send + Sync {
    /// Get a user's settings, if a row exists.
    fn get_settings(&self, user_id: &UserId) -> Result<Option<UserSettings>, StoreError>;

    /// Insert or replace a user's settings.
    fn upsert_settings(&self, settings: &UserSettings) -> Result<(), StoreError>;
}
