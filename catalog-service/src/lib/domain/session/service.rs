use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::PasswordError;
use chrono::Utc;

use crate::domain::session::models::CredentialRecord;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::LoginOutcome;
use crate::domain::session::models::NewCredential;
use crate::domain::session::models::SessionPolicy;
use crate::domain::session::models::Username;
use crate::session::errors::SessionError;
use crate::session::ports::CredentialRepository;
use crate::session::ports::SessionServicePort;

/// Domain service implementation for session operations.
///
/// Concrete implementation of SessionServicePort with dependency injection.
/// Holds no per-session state; everything lives in the repository.
pub struct SessionService<CR>
where
    CR: CredentialRepository,
{
    repository: Arc<CR>,
    authenticator: Arc<Authenticator>,
    policy: SessionPolicy,
}

impl<CR> SessionService<CR>
where
    CR: CredentialRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential persistence implementation
    /// * `authenticator` - Password, access token and refresh token primitives
    /// * `policy` - Session lifetimes
    pub fn new(repository: Arc<CR>, authenticator: Arc<Authenticator>, policy: SessionPolicy) -> Self {
        Self {
            repository,
            authenticator,
            policy,
        }
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// Provision a credential unless one already exists for the username.
    ///
    /// # Returns
    /// The created record, or None when the username was already present
    ///
    /// # Errors
    /// * `RandomSource` / `Unknown` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    pub async fn seed_credential(
        &self,
        username: Username,
        password: String,
    ) -> Result<Option<CredentialRecord>, SessionError> {
        if self.repository.find_by_username(&username).await?.is_some() {
            return Ok(None);
        }

        let authenticator = Arc::clone(&self.authenticator);
        let password_digest = tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| SessionError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| match e {
                PasswordError::RandomSource(msg) => SessionError::RandomSource(msg),
                other => SessionError::Unknown(format!("Password hashing failed: {}", other)),
            })?;

        let record = self
            .repository
            .create(NewCredential {
                username,
                password_digest,
            })
            .await?;

        Ok(Some(record))
    }

    /// Verify the password and sign an access token for the record.
    ///
    /// Argon2 with 64 MiB is CPU-bound; it runs on the blocking pool.
    async fn authenticate(&self, password: String, record: &CredentialRecord) -> Result<String, SessionError> {
        let authenticator = Arc::clone(&self.authenticator);
        let digest = record.password_digest.clone();
        let user_id = record.id;
        let username = record.username.as_str().to_string();

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &digest, user_id, &username)
        })
        .await
        .map_err(|e| SessionError::Unknown(format!("Password verification task failed: {}", e)))?;

        match result {
            Ok(authenticated) => Ok(authenticated.access_token),
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::info!(user_id = %record.id, "Login rejected: password mismatch");
                Err(SessionError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(PasswordError::MalformedDigest(msg))) => {
                tracing::error!(user_id = %record.id, "Stored password digest is malformed: {}", msg);
                Err(SessionError::MalformedDigest(msg))
            }
            Err(AuthenticationError::PasswordError(e)) => Err(SessionError::Unknown(e.to_string())),
            Err(AuthenticationError::JwtError(e)) => Err(SessionError::Signing(e.to_string())),
        }
    }

    async fn find_session(&self, refresh_token: &str) -> Result<CredentialRecord, SessionError> {
        let record = match self.repository.find_by_refresh_token(refresh_token).await {
            Ok(Some(record)) => record,
            Ok(None) => return Err(SessionError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(error = %e, "Refresh token lookup failed");
                return Err(SessionError::InvalidCredentials);
            }
        };

        // Repositories look tokens up by exact match; this only catches a looser match.
        let stored = record.refresh_token.as_deref().unwrap_or_default();
        if !self.authenticator.refresh_token_matches(refresh_token, stored) {
            return Err(SessionError::InvalidCredentials);
        }

        if record.refresh_token_expired(Utc::now()) {
            tracing::info!(user_id = %record.id, "Refresh rejected: token expired");
            return Err(SessionError::InvalidCredentials);
        }

        Ok(record)
    }
}

#[async_trait]
impl<CR> SessionServicePort for SessionService<CR>
where
    CR: CredentialRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, SessionError> {
        let mut record = match self.repository.find_by_username(&command.username).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::info!(username = %command.username, "Login rejected: unknown username");
                return Err(SessionError::InvalidCredentials);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Credential lookup failed during login");
                return Err(SessionError::InvalidCredentials);
            }
        };

        let access_token = self.authenticate(command.password, &record).await?;

        let refresh_token = self
            .authenticator
            .generate_refresh_token()
            .map_err(|e| SessionError::RandomSource(e.to_string()))?;
        let refresh_token_expires_at = Utc::now() + self.policy.refresh_token_lifetime;

        // Overwrites any previous refresh token, ending that session.
        record.start_session(refresh_token.clone(), refresh_token_expires_at);
        let record = self.repository.save(record).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist refresh token");
            SessionError::SessionPersist(e.to_string())
        })?;

        tracing::info!(user_id = %record.id, "Session opened");

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            refresh_token_expires_at,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, SessionError> {
        if refresh_token.is_empty() {
            return Err(SessionError::InvalidCredentials);
        }

        let record = self.find_session(refresh_token).await?;

        self.authenticator
            .issue_access_token(record.id, record.username.as_str())
            .map_err(|e| SessionError::Signing(e.to_string()))
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), SessionError> {
        if refresh_token.is_empty() {
            return Err(SessionError::InvalidCredentials);
        }

        self.repository
            .clear_refresh_token(refresh_token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to clear refresh token");
                SessionError::SessionPersist(e.to_string())
            })
    }
}
