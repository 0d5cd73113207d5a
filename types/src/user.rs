//! User identity and its owned records.

use crate::{EthAddress, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// `wallet_address` is set at most once via the explicit linking
/// operation and is unique across all users. Users are never
/// hard-deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub full_name: String,
    /// Unique across all users.
    pub email: String,
    /// Argon2 PHC string, never exposed through the API.
    pub password_hash: String,
    pub phone: Option<String>,
    /// Linked wallet; unique across all users when present.
    pub wallet_address: Option<EthAddress>,
}

/// Per-user notification toggles, created with defaults at signup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: UserId,
    pub email_notifications: bool,
    pub sms_notifications: bool,
}

impl UserSettings {
    /// Defaults applied at signup: email on, SMS off.
    pub fn defaults_for(user_id: UserId) -> Self {
        Self {
            user_id,
            email_notifications: true,
            sms_notifications: false,
        }
    }
}

/// A contact-form submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub subject: String,
    pub message: String,
    pub submitted_by: UserId,
    pub submitted_at: Timestamp,
}
