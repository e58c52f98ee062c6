//! Attendance code hashing and verification.
//!
//! Codes are compared case-insensitively by normalizing to uppercase before
//! hashing. Only the Argon2 PHC string is ever persisted.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, thread_rng};

pub const MIN_CODE_LEN: usize = 6;
pub const MAX_CODE_LEN: usize = 10;
const GENERATED_CODE_LEN: usize = 6;

/// Trims surrounding whitespace and uppercases.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Length check on the normalized code.
pub fn is_well_formed(raw: &str) -> bool {
    let len = normalize_code(raw).chars().count();
    (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&len)
}

pub fn hash_code(raw: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(normalize_code(raw).as_bytes(), &salt)?
        .to_string())
}

/// Checks a submission against a stored hash. Any parse or verifier error is a
/// non-match. The digest comparison inside `verify_password` is constant-time.
pub fn verify_code(submitted: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(normalize_code(submitted).as_bytes(), &parsed)
        .is_ok()
}

/// Random uppercase alphanumeric code for sessions opened without one.
pub fn generate_code() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_CODE_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}
