//! # Password Policy
//!
//! Hashing and strength checks for user passwords.
//!
//! ## Lifecycle of a Password
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /users { password: "Secret1!" }                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_password_strength() ← upper + symbol + digit present?        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  hash_password() ← Argon2id, random salt, PHC string                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO users (..., password) ← only the hash is persisted        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{CoreError, CoreResult};

/// Characters that satisfy the "special character" class.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-={}[]|:;\"'<>,.?/~`";

/// Hashes a plaintext password for storage.
///
/// Every call uses a fresh salt, so hashing the same input twice yields two
/// different strings that both verify.
///
/// ## Errors
/// [`CoreError::Hashing`] when the primitive rejects the input.
pub fn hash_password(plaintext: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| CoreError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks a plaintext password against a stored hash.
///
/// A malformed stored hash verifies as `false`.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Returns true iff the candidate contains an uppercase letter, a member of
/// [`SPECIAL_CHARACTERS`], and a digit.
///
/// ## Classification Order
/// Each character counts toward at most one class, checked in this order:
/// ```text
/// uppercase? ──yes──► has_upper
///     │no
///     ▼
/// special?   ──yes──► has_special
///     │no
///     ▼
/// digit?     ──yes──► has_digit
/// ```
/// The scan stops as soon as all three flags are set. Length is not checked
/// here; that is the `length(min = 8)` rule's job.
///
/// ## Example
/// ```rust
/// use storefront_core::password::validate_password_strength;
///
/// assert!(validate_password_strength("Abc123!"));
/// assert!(!validate_password_strength("abcdefgh"));
/// ```
pub fn validate_password_strength(candidate: &str) -> bool {
    let mut has_upper = false;
    let mut has_special = false;
    let mut has_digit = false;

    for c in candidate.chars() {
        if c.is_uppercase() {
            has_upper = true;
        } else if SPECIAL_CHARACTERS.contains(c) {
            has_special = true;
        } else if c.is_numeric() {
            has_digit = true;
        }

        if has_upper && has_special && has_digit {
            return true;
        }
    }

    false
}

// =============================================================================
// Unit Tests
// =============================================================================
