//! Authentication utilities library
//!
//! Provides the authentication primitives used by the catalog backend:
//! - Password hashing (Argon2id, self-describing encoded digests)
//! - JWT access token issuance and validation
//! - Opaque refresh tokens with constant-time matching
//! - Authentication coordination
//!
//! Services define their own session flows and persistence on top of these.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hash.starts_with("$argon2id$v=19$m=65536,t=1,p=4$"));
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::JwtHandler;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!", "catalog");
//! let token = handler.issue(42, "alice").unwrap();
//! let claims = handler.parse(&token).unwrap();
//! assert_eq!(claims.sub, "42");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", "catalog");
//!
//! // Provision: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, 1, "alice").unwrap();
//! let refresh_token = auth.generate_refresh_token().unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.username, "alice");
//! assert!(auth.refresh_token_matches(&refresh_token, &refresh_token));
//! ```

pub mod authenticator;
pub mod compare;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use compare::constant_time_eq;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::RefreshTokenError;
pub use refresh::RefreshTokenManager;
