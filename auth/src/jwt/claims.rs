use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token claims.
///
/// Identity plus the registered `iss`, `iat` and `exp` claims (RFC 7519).
/// Built fresh for every issued token and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Username of the subject
    pub username: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for user authentication with automatic expiration.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `username` - Username of the user
    /// * `issuer` - Service label placed in `iss`
    /// * `lifetime` - Time until token expires
    ///
    /// # Returns
    /// Claims issued now and expiring after `lifetime`
    pub fn for_user(
        user_id: impl ToString,
        username: impl Into<String>,
        issuer: impl Into<String>,
        lifetime: Duration,
    ) -> Self {
        Self::issued_at(user_id, username, issuer, Utc::now(), lifetime)
    }

    /// Same as [`Claims::for_user`] with an explicit issue time.
    pub fn issued_at(
        user_id: impl ToString,
        username: impl Into<String>,
        issuer: impl Into<String>,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            username: username.into(),
            iss: issuer.into(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let claims = Claims::for_user(42, "alice", "catalog", Duration::hours(24));

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "catalog");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60); // 24 hours
    }

    #[test]
    fn test_issued_at() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::issued_at(7, "bob", "catalog", now, Duration::minutes(5));

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_300);
    }
}
