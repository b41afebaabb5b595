// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for Fixtrack: Argon2id credential hashing and in-process
//! bearer-token sessions.
//!
//! [`Argon2Hasher`] implements the core `PasswordHasher` seam;
//! [`SessionManager`] verifies credentials against a `UserStore`, issues
//! opaque tokens, and resolves them back to sessions via the core
//! `Authenticator` trait.

pub mod hasher;
pub mod sessions;

pub use hasher::Argon2Hasher;
pub use sessions::SessionManager;
