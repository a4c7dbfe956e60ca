//! Credential hashing helpers
//!
//! # Pure Functions
//!
//! This module contains ONLY pure functions. No HTTP framework dependencies
//! (Axum, etc.) - those belong in module-specific code. Stored form is
//! `salt$hash` where both parts are lowercase hex and the hash is
//! SHA-256(salt || password).

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Hash a password with a fresh random 16-byte salt
///
/// Returns the storable `salt$hash` string.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex: String = salt.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}${}", salt_hex, digest_with_salt(&salt_hex, password))
}

/// Verify a password against a stored `salt$hash` string
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt_hex, hash_hex)) => digest_with_salt(salt_hex, password) == hash_hex,
        None => false,
    }
}

fn digest_with_salt(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn same_password_different_salt() {
        let a = hash_password("secret");
        let b = hash_password("secret");
        assert_ne!(a, b);
        assert!(verify_password("secret", &a));
        assert!(verify_password("secret", &b));
    }

    #[test]
    fn malformed_stored_value_rejected() {
        assert!(!verify_password("anything", "no-dollar-separator"));
    }
}
