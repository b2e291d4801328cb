//! Account passwords
//!
//! Stored as Argon2id PHC strings. Every new password passes the length
//! rule before it is hashed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::types::AuthError;

/// Shortest password accepted at sign-up or reset
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a password chosen at sign-up or reset.
///
/// Fails with [`AuthError::WeakPassword`] before any hashing work when the
/// password is shorter than [`MIN_PASSWORD_LEN`] characters.
pub fn hash_new_password(password: &str) -> Result<String, AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {e}")))
}

/// Match a sign-in attempt against the stored hash.
///
/// A mismatch is [`AuthError::InvalidCredential`]; a stored value that is not
/// a PHC string is an internal error.
pub fn check_password(attempt: &str, stored: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AuthError::Internal(format!("Stored password hash unreadable: {e}")))?;

    Argon2::default()
        .verify_password(attempt.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredential)
}
