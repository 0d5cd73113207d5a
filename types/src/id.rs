//! Opaque identifiers for users, verification records, and QR tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random (v4) identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap an existing identifier string.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

uuid_id! {
    /// Identity of a registered user.
    UserId
}

uuid_id! {
    /// Identity of a single verification attempt (one per pipeline run).
    RecordId
}

uuid_id! {
    /// Server-generated token embedded in the scannable QR link.
    ///
    /// Globally unique: at most one verification record may carry a given
    /// QR id, and at most one QR id may exist per verified document number.
    QrId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = QrId::generate();
        let b = QrId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn id_round_trips_through_string() {
        let id = RecordId::generate();
        let copy = RecordId::new(id.as_str());
        assert_eq!(id, copy);
    }

    #[test]
    fn serde_is_transparent() {
        let id = UserId::new("abc-123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc-123\"");
    }
}
