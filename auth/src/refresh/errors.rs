use thiserror::Error;

/// Error type for refresh token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Secure random source unavailable: {0}")]
    RandomSource(String),
}
