// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication trait seams.

use async_trait::async_trait;

use crate::error::FixtrackError;
use crate::session::Session;

/// Resolves opaque bearer tokens to authenticated sessions.
///
/// An expired or unknown token surfaces `Unauthenticated`; the core treats
/// that as equivalent to no session at all.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticates the given token and returns the active session.
    async fn authenticate(&self, token: &str) -> Result<Session, FixtrackError>;
}

/// Credential hashing seam. Hashes are opaque to the core; only this trait's
/// implementation can produce or verify them.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into an opaque storable string.
    fn hash_password(&self, password: &str) -> Result<String, FixtrackError>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}
