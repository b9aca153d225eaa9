use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Secure random source unavailable: {0}")]
    RandomSource(String),

    #[error("Stored password digest is malformed: {0}")]
    MalformedDigest(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
