//! Pluggable one-way password hashing.

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;

use super::errors::AuthError;

pub trait CredentialHasher: Send + Sync {
    /// Name recorded in logs.
    fn algorithm(&self) -> &'static str;
    fn hash(&self, password: &str) -> Result<String, AuthError>;
    /// `false` for a mismatch or an unparseable stored hash.
    fn verify(&self, password: &str, stored_hash: &str) -> bool;
}

/// Salted argon2id, PHC string format.
#[derive(Default, Clone, Copy)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn algorithm(&self) -> &'static str { "argon2" }

    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashError(e.to_string()))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }
}
