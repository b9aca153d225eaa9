use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// JWT token handler for issuing and validating access tokens.
///
/// Uses HS256 (HMAC with SHA-256). Tokens are self-contained: validation
/// checks signature, issuer and expiry only, with no storage lookup.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    lifetime: Duration,
    has_secret: bool,
}

impl JwtHandler {
    /// Default access token lifetime in hours.
    pub const DEFAULT_LIFETIME_HOURS: i64 = 24;

    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `issuer` - Label written to and required in the `iss` claim
    ///
    /// # Returns
    /// JwtHandler configured with HS256 and a 24 hour token lifetime
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Rotating the secret invalidates every outstanding token
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
            lifetime: Duration::hours(Self::DEFAULT_LIFETIME_HOURS),
            has_secret: !secret.is_empty(),
        }
    }

    /// Override the access token lifetime.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Issue a signed access token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Subject identifier
    /// * `username` - Username carried in the token
    ///
    /// # Returns
    /// Compact JWT string
    ///
    /// # Errors
    /// * `SigningFailed` - No secret configured or signing failed
    pub fn issue(&self, user_id: impl ToString, username: &str) -> Result<String, JwtError> {
        let claims = Claims::for_user(user_id, username, self.issuer.as_str(), self.lifetime);
        self.encode(&claims)
    }

    /// Sign prepared claims.
    ///
    /// # Errors
    /// * `SigningFailed` - No secret configured or signing failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        if !self.has_secret {
            return Err(JwtError::SigningFailed(
                "signing secret is not configured".to_string(),
            ));
        }

        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Validate a token and return its claims.
    ///
    /// # Arguments
    /// * `token` - JWT token string
    ///
    /// # Returns
    /// Embedded claims
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not verify against the secret
    /// * `TokenExpired` - `exp` is in the past
    /// * `Malformed` - Token cannot be decoded or carries the wrong issuer
    pub fn parse(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    _ => JwtError::Malformed(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
