//! Cryptographic primitives for the Veridoc service.
//!
//! Three concerns live here:
//! 1. **Content hashing** — keccak-256 over uploaded file bytes, matching
//!    the digest anchored on the ledger.
//! 2. **Ownership proofs** — EIP-191 personal-message hashing, ECDSA
//!    public-key recovery, and EIP-55 checksummed address rendering for
//!    the QR disclosure gate.
//! 3. **Password hashing** — argon2 PHC strings for login credentials.

pub mod error;
pub mod eth;
pub mod hash;
pub mod password;

pub use error::CryptoError;
pub use eth::{address_of, checksummed, personal_message_hash, recover_address};
pub use hash::{content_hash, keccak_256};
pub use password::{hash_password, verify_password};
