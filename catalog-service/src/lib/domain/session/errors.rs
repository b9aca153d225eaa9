use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid numeric user id: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all session-related operations
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    // Authentication outcome; never says which check failed
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Server-side failures
    #[error("Stored password digest is malformed: {0}")]
    MalformedDigest(String),

    #[error("Secure random source unavailable: {0}")]
    RandomSource(String),

    #[error("Access token signing failed: {0}")]
    Signing(String),

    #[error("Session could not be persisted: {0}")]
    SessionPersist(String),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
