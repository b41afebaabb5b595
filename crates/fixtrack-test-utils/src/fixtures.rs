// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for tests across the workspace.

use chrono::{Duration, Utc};

use fixtrack_core::{NewUser, Role, Session, UserId};

/// An eight-hour session for the given identity, issued now.
#[must_use]
pub fn session_for(user_id: UserId, role: Role) -> Session {
    let now = Utc::now();
    Session {
        user_id,
        role,
        issued_at: now,
        expires_at: now + Duration::hours(8),
    }
}

/// A user payload with a unique login derived from the role and suffix.
#[must_use]
pub fn new_user(role: Role, login: &str) -> NewUser {
    NewUser {
        display_name: format!("{role} {login}"),
        login: login.to_string(),
        phone: "+1-555-0100".to_string(),
        role,
        password_hash: "test-hash".to_string(),
    }
}
