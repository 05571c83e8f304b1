//! # Password Hashing
//!
//! Credential derivation for stored accounts.
//!
//! ## Why Argon2id
//! The database file lives on the device and can be copied off it, so stored
//! credentials must hold up offline. All credentials go through Argon2id
//! with a per-password random salt, serialized as a PHC string
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so the stored value is
//! self-describing and parameters can be raised later without a migration.
//!
//! ## Usage
//! ```rust
//! use bloom_core::password::{hash_password, verify_password};
//!
//! let stored = hash_password("secret1").unwrap();
//! assert!(verify_password("secret1", &stored));
//! assert!(!verify_password("wrong", &stored));
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{CoreError, CoreResult};

/// Hashes a raw password with Argon2id and a fresh random salt.
///
/// Returns the PHC-formatted hash string to store in the `password_hash`
/// column. The raw password is never persisted anywhere.
pub fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a raw password against a stored PHC hash string.
///
/// Any failure - malformed hash, mismatch - reads as "does not verify".
/// Login paths treat all of those identically as invalid credentials, so
/// there is nothing useful to distinguish for the caller.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();

        // Same password, different salt, different hash
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a));
        assert!(verify_password("secret1", &b));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("secret1", "not-a-phc-string"));
        assert!(!verify_password("secret1", ""));
    }
}
