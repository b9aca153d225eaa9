use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::session::errors::UserIdError;
use crate::session::errors::UsernameError;

/// Credential record of a user.
///
/// The subset of the user entity this service reads and mutates. The
/// password digest is set at provisioning; the refresh-token fields change
/// only through login and logout.
#[derive(Clone)]
pub struct CredentialRecord {
    pub id: UserId,
    pub username: Username,
    pub password_digest: String,
    pub refresh_token: Option<String>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    /// Attach a new refresh token, replacing any previous one.
    pub fn start_session(&mut self, refresh_token: String, expires_at: DateTime<Utc>) {
        self.refresh_token = Some(refresh_token);
        self.refresh_token_expires_at = Some(expires_at);
    }

    /// Whether the stored refresh token can no longer be exchanged at `now`.
    ///
    /// A token without an expiry is treated as expired.
    pub fn refresh_token_expired(&self, now: DateTime<Utc>) -> bool {
        match self.refresh_token_expires_at {
            Some(expires_at) => expires_at <= now,
            None => true,
        }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_digest", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("refresh_token_expires_at", &self.refresh_token_expires_at)
            .finish()
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a decimal integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        s.parse::<i64>()
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Any non-empty string up to 64 characters; uniqueness is enforced by storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is empty
    /// * `TooLong` - Username longer than 64 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length == 0 {
            Err(UsernameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Credential to provision, with the password already hashed.
#[derive(Clone)]
pub struct NewCredential {
    pub username: Username,
    pub password_digest: String,
}

/// Command to open a session with username and password
pub struct LoginCommand {
    pub username: Username,
    pub password: String,
}

impl LoginCommand {
    pub fn new(username: Username, password: String) -> Self {
        Self { username, password }
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Tokens handed to the client after a successful login.
///
/// The refresh token travels only in a cookie; the access token only in the body.
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Session lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub refresh_token_lifetime: Duration,
}

impl SessionPolicy {
    pub const DEFAULT_REFRESH_DAYS: i64 = 7;

    pub fn new(refresh_token_lifetime: Duration) -> Self {
        Self {
            refresh_token_lifetime,
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::new(Duration::days(Self::DEFAULT_REFRESH_DAYS))
    }
}
