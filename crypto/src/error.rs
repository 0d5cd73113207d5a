use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("signature must be 65 bytes (r ‖ s ‖ v), got {0}")]
    SignatureLength(usize),

    #[error("signature is not valid hex")]
    SignatureHex,

    #[error("invalid recovery id: {0}")]
    RecoveryId(u8),

    #[error("public key recovery failed")]
    Recovery,

    #[error("password hashing failed: {0}")]
    Password(String),
}
