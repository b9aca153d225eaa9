use async_trait::async_trait;

use crate::domain::session::models::CredentialRecord;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::LoginOutcome;
use crate::domain::session::models::NewCredential;
use crate::session::errors::SessionError;
use crate::session::models::Username;

/// Port for session domain service operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Open a session with username and password.
    ///
    /// # Arguments
    /// * `command` - Username and plaintext password
    ///
    /// # Returns
    /// Access token plus the refresh token and its expiry
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username, lookup failure, or wrong password
    /// * `MalformedDigest` - Stored digest cannot be parsed
    /// * `Signing` - Access token could not be signed
    /// * `RandomSource` - Refresh token could not be generated
    /// * `SessionPersist` - Refresh token could not be stored
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, SessionError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is left unchanged.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Token empty, unknown, or expired
    /// * `Signing` - Access token could not be signed
    async fn refresh(&self, refresh_token: &str) -> Result<String, SessionError>;

    /// Revoke the session holding a refresh token.
    ///
    /// Succeeds when no session holds the token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Token empty
    /// * `SessionPersist` - Stored token could not be cleared
    async fn logout(&self, refresh_token: &str) -> Result<(), SessionError>;
}

/// Persistence operations for credential records.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Persist a newly provisioned credential.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, credential: NewCredential) -> Result<CredentialRecord, SessionError>;

    /// Retrieve a record by username.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, SessionError>;

    /// Retrieve the record currently holding a refresh token.
    ///
    /// Implementations must match the token exactly. The service still
    /// re-compares the stored value, which only matters for an
    /// implementation whose match is looser than exact.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<CredentialRecord>, SessionError>;

    /// Store the refresh-token fields of an existing record.
    ///
    /// # Errors
    /// * `DatabaseError` - Record missing or database operation failed
    async fn save(&self, record: CredentialRecord) -> Result<CredentialRecord, SessionError>;

    /// Remove a refresh token from whichever record holds it.
    ///
    /// No-op when no record holds the token.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn clear_refresh_token(&self, refresh_token: &str) -> Result<(), SessionError>;
}
