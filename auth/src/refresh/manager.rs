use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::errors::RefreshTokenError;
use crate::compare::constant_time_eq;

/// Opaque refresh token generation and matching.
///
/// Tokens are random bytes encoded as URL-safe base64 without padding,
/// so they can be placed in a cookie without further escaping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshTokenManager;

impl RefreshTokenManager {
    /// Entropy per token in bytes.
    pub const TOKEN_BYTES: usize = 32;

    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh refresh token.
    ///
    /// # Errors
    /// * `RandomSource` - Secure randomness unavailable
    pub fn generate(&self) -> Result<String, RefreshTokenError> {
        let mut bytes = [0u8; Self::TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| RefreshTokenError::RandomSource(e.to_string()))?;

        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Compare a presented token against a stored one in constant time.
    pub fn secure_compare(&self, presented: &str, stored: &str) -> bool {
        constant_time_eq(presented.as_bytes(), stored.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;
    use std::time::Instant;

    use super::*;

    #[test]
    fn test_generate_shape() {
        let manager = RefreshTokenManager::new();
        let token = manager.generate().expect("Failed to generate token");

        // 32 bytes -> 43 unpadded base64 characters
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(URL_SAFE_NO_PAD.decode(&token).unwrap().len(), 32);
    }

    #[test]
    fn test_generate_is_unique() {
        let manager = RefreshTokenManager::new();
        let tokens: HashSet<String> = (0..256)
            .map(|_| manager.generate().expect("Failed to generate token"))
            .collect();

        assert_eq!(tokens.len(), 256);
    }

    #[test]
    fn test_secure_compare() {
        let manager = RefreshTokenManager::new();
        let token = manager.generate().unwrap();
        let other = manager.generate().unwrap();

        assert!(manager.secure_compare(&token, &token.clone()));
        assert!(!manager.secure_compare(&token, &other));
        assert!(!manager.secure_compare(&token, ""));
        assert!(!manager.secure_compare(&token, &token[..42]));
    }

    // Best-effort statistical check; timing is noisy on shared machines.
    #[test]
    #[ignore]
    fn test_secure_compare_timing_independent_of_mismatch_position() {
        const ROUNDS: usize = 200_000;

        let manager = RefreshTokenManager::new();
        let stored = "a".repeat(4096);
        let early = format!("b{}", "a".repeat(4095));
        let late = format!("{}b", "a".repeat(4095));

        let measure = |candidate: &str| -> Duration {
            let start = Instant::now();
            for _ in 0..ROUNDS {
                std::hint::black_box(manager.secure_compare(candidate, &stored));
            }
            start.elapsed()
        };

        // Warm up, then interleave measurements.
        measure(&early);
        let mut early_total = Duration::ZERO;
        let mut late_total = Duration::ZERO;
        for _ in 0..5 {
            early_total += measure(&early);
            late_total += measure(&late);
        }

        let ratio = early_total.as_secs_f64() / late_total.as_secs_f64();
        assert!(
            (0.8..1.25).contains(&ratio),
            "early/late mismatch timing ratio {ratio:.3}"
        );
    }
}
