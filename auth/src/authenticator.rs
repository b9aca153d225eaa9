use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::HashParams;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::refresh::RefreshTokenError;
use crate::refresh::RefreshTokenManager;

/// Authentication coordinator combining password verification, access token
/// signing and refresh token handling.
///
/// Holds the signing secret; construct once at startup and share.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    refresh_tokens: RefreshTokenManager,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `issuer` - Issuer label for access tokens
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(jwt_secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret, issuer),
            refresh_tokens: RefreshTokenManager::new(),
        }
    }

    /// Override the access token lifetime (default 24 hours).
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.jwt_handler = self.jwt_handler.with_lifetime(lifetime);
        self
    }

    /// Override the cost parameters used for new password digests.
    pub fn with_password_params(mut self, params: HashParams) -> Self {
        self.password_hasher = PasswordHasher::with_params(params);
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and generate an access token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_digest` - Stored password digest
    /// * `user_id` - Subject for the issued token
    /// * `username` - Username for the issued token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored digest is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_digest: &str,
        user_id: impl ToString,
        username: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_digest)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.issue(user_id, username)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Generate an access token without password verification.
    ///
    /// Used by the refresh flow, where identity was established by the refresh token.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_access_token(&self, user_id: impl ToString, username: &str) -> Result<String, JwtError> {
        self.jwt_handler.issue(user_id, username)
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    /// * `InvalidSignature`, `TokenExpired`, `Malformed` - Token is not acceptable
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.parse(token)
    }

    /// Generate an opaque refresh token.
    ///
    /// # Errors
    /// * `RandomSource` - Secure randomness unavailable
    pub fn generate_refresh_token(&self) -> Result<String, RefreshTokenError> {
        self.refresh_tokens.generate()
    }

    /// Constant-time match of a presented refresh token against a stored one.
    pub fn refresh_token_matches(&self, presented: &str, stored: &str) -> bool {
        self.refresh_tokens.secure_compare(presented, stored)
    }
}
