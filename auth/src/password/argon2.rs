use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use argon2::ARGON2ID_IDENT;

use super::errors::PasswordError;

/// Largest memory cost accepted from a stored digest (4 GiB, in KiB).
pub const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Argon2id cost parameters for new digests.
///
/// Every digest records the parameters it was produced with, so raising
/// these later does not invalidate digests already in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
    /// Derived key length in bytes
    pub output_len: usize,
    /// Salt length in bytes
    pub salt_len: usize,
}

impl HashParams {
    fn to_argon2(self) -> Result<Params, argon2::Error> {
        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(self.output_len),
        )
    }
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 1,
            parallelism: 4,
            output_len: 32,
            salt_len: 16,
        }
    }
}

/// Password hashing implementation.
///
/// Produces PHC strings of the form
/// `$argon2id$v=19$m=<kib>,t=<iterations>,p=<lanes>$<salt>$<key>`.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: HashParams,
}

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher using Argon2id with t=1, m=64 MiB, p=4, a 16-byte salt and a 32-byte key
    pub fn new() -> Self {
        Self::with_params(HashParams::default())
    }

    /// Create a password hasher with explicit cost parameters.
    ///
    /// Only affects new digests; verification always uses the costs recorded in the stored digest.
    pub fn with_params(params: HashParams) -> Self {
        Self { params }
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `RandomSource` - Secure randomness unavailable for the salt
    /// * `HashingFailed` - Hashing rejected the configured parameters
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = vec![0u8; self.params.salt_len];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| PasswordError::RandomSource(e.to_string()))?;

        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        let params = self
            .params
            .to_argon2()
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_digest` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedDigest` - Hash format is invalid, not Argon2id v19, or declares unusable costs
    pub fn verify(&self, password: &str, stored_digest: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(stored_digest)
            .map_err(|e| PasswordError::MalformedDigest(format!("Invalid password hash: {}", e)))?;

        if parsed_hash.algorithm != ARGON2ID_IDENT {
            return Err(PasswordError::MalformedDigest(format!(
                "unsupported algorithm {}",
                parsed_hash.algorithm
            )));
        }
        if parsed_hash.version != Some(u32::from(Version::V0x13)) {
            return Err(PasswordError::MalformedDigest(
                "unsupported version".to_string(),
            ));
        }

        if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
            return Err(PasswordError::MalformedDigest(
                "missing salt or key".to_string(),
            ));
        }

        let params = Params::try_from(&parsed_hash)
            .map_err(|e| PasswordError::MalformedDigest(format!("Invalid parameters: {}", e)))?;
        if params.m_cost() > MAX_MEMORY_KIB {
            return Err(PasswordError::MalformedDigest(format!(
                "memory cost {} KiB exceeds {} KiB",
                params.m_cost(),
                MAX_MEMORY_KIB
            )));
        }

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedDigest(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
