//! PBKDF2-HMAC-SHA256 password hashing.
//!
//! Hashes are stored as PHC strings, e.g.
//! `$pbkdf2-sha256$i=600000,l=32$<salt>$<hash>`, so the round count and salt
//! travel with the hash and verification never needs configuration.

use pbkdf2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use rand::RngCore;

use super::AuthError;

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 8;

/// Derived key length in bytes.
pub const OUTPUT_LENGTH: usize = 32;

/// Salted one-way password hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    rounds: u32,
}

impl PasswordHasher {
    /// Create a hasher producing hashes with `rounds` PBKDF2 iterations.
    #[must_use]
    pub const fn new(rounds: u32) -> Self {
        Self { rounds }
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the hash cannot be computed.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|_| AuthError::PasswordHash)?;

        let params = Params {
            rounds: self.rounds,
            output_length: OUTPUT_LENGTH,
        };

        Pbkdf2
            .hash_password_customized(plaintext.as_bytes(), None, None, params, &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A stored value that is not a valid PHC string never verifies.
    #[must_use]
    pub fn verify(plaintext: &str, stored_hash: &str) -> bool {
        PasswordHash::new(stored_hash).is_ok_and(|parsed| {
            Pbkdf2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TEST_ROUNDS: u32 = 1_000;

    #[test]
    fn test_hash_is_not_plaintext() {
        let hasher = PasswordHasher::new(TEST_ROUNDS);
        let hash = hasher.hash("pass1234").unwrap();
        assert_ne!(hash, "pass1234");
        assert!(!hash.contains("pass1234"));
    }

    #[test]
    fn test_verify_roundtrip() {
        let hasher = PasswordHasher::new(TEST_ROUNDS);
        let hash = hasher.hash("12345678").unwrap();
        assert!(PasswordHasher::verify("12345678", &hash));
    }

    #[test]
    fn test_verify_rejects_other_password() {
        let hasher = PasswordHasher::new(TEST_ROUNDS);
        let hash = hasher.hash("pass1234").unwrap();
        assert!(!PasswordHasher::verify("pass1235", &hash));
        assert!(!PasswordHasher::verify("", &hash));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let hasher = PasswordHasher::new(TEST_ROUNDS);
        let first = hasher.hash("same").unwrap();
        let second = hasher.hash("same").unwrap();
        assert_ne!(first, second);
        assert!(PasswordHasher::verify("same", &first));
        assert!(PasswordHasher::verify("same", &second));
    }

    #[test]
    fn test_phc_string_records_parameters() {
        let hasher = PasswordHasher::new(TEST_ROUNDS);
        let hash = hasher.hash("pass1234").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();

        assert_eq!(parsed.algorithm.as_str(), "pbkdf2-sha256");
        assert_eq!(
            parsed.params.get_decimal("i"),
            Some(TEST_ROUNDS)
        );
        let salt = parsed.salt.unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(salt.decode_b64(&mut buf).unwrap().len(), SALT_LENGTH);
        assert_eq!(parsed.hash.unwrap().len(), OUTPUT_LENGTH);
    }

    #[test]
    fn test_verify_uses_rounds_from_hash() {
        let hash = PasswordHasher::new(TEST_ROUNDS).hash("pw-123456").unwrap();
        // Verifying does not depend on the hasher currently configured.
        assert!(PasswordHasher::verify("pw-123456", &hash));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!PasswordHasher::verify("anything", "not-a-phc-string"));
        assert!(!PasswordHasher::verify("anything", ""));
    }
}
