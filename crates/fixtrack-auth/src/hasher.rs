// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing behind the core `PasswordHasher` seam.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;

use fixtrack_core::{FixtrackError, PasswordHasher};

/// Argon2id hasher with the crate's default parameters.
///
/// Produced hashes are PHC strings carrying their own salt and parameters,
/// so verification needs no side state and parameter upgrades only affect
/// new hashes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash_password(&self, password: &str) -> Result<String, FixtrackError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| FixtrackError::Storage {
                source: Box::new(e),
            })?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        // An unparseable stored hash is treated as a mismatch, not an error;
        // login must not leak whether the account exists or is corrupt.
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
