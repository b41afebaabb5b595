// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the Fixtrack backend seams.
//!
//! All backends extend the [`Backend`] base trait and use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod auth;
pub mod backend;
pub mod store;

pub use auth::{Authenticator, PasswordHasher};
pub use backend::Backend;
pub use store::{CommentStore, TicketStore, UserStore};
