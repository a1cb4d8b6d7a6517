use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;

use crate::errors::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

lazy_static! {
    /// Configured Argon2 instance with explicit parameters for consistent hashing
    /// Parameters: memory=19456 KiB, iterations=2, parallelism=1
    static ref ARGON2: Argon2<'static> = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(19456, 2, 1, None).expect("Invalid Argon2 params")
    );
}

/// Hash a password using Argon2id. Surrounding whitespace is not part of
/// the password.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.trim();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::WeakPassword);
    }

    let salt = SaltString::generate(&mut OsRng);
    ARGON2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid password hash: {e}")))?;
    Ok(ARGON2
        .verify_password(password.trim().as_bytes(), &parsed_hash)
        .is_ok())
}
