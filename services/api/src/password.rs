//! Password hashing with Argon2id

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use tracing::warn;

/// Hash a plain password into a PHC string with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verify a plain password against a stored hash
///
/// An unparsable stored hash never verifies.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Stored password hash could not be parsed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_the_password() {
        let hash = hash_password("pw123456").unwrap();

        assert_ne!(hash, "pw123456");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("pw123456").unwrap();
        let second = hash_password("pw123456").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("pw123456", &first));
        assert!(verify_password("pw123456", &second));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("pw123456").unwrap();

        assert!(!verify_password("pw1234567", &hash));
        assert!(!verify_password("PW123456", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("pw123456", "not-a-phc-string"));
        assert!(!verify_password("pw123456", ""));
    }
}
