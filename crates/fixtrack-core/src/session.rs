// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated session state and the actor view handed to policy checks.
//!
//! A `Session` is explicit and injectable: it is created by the auth
//! collaborator at login and destroyed at logout or token expiry. The core
//! never reads ambient global state to find out who is calling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// An authenticated identity with a validity window.
///
/// Token renewal is the auth collaborator's responsibility; the core only
/// checks the window it was handed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// The role of the authenticated user.
    #[must_use]
    pub fn current_role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    #[must_use]
    pub fn is_technician(&self) -> bool {
        self.role == Role::Technician
    }

    #[must_use]
    pub fn is_operator(&self) -> bool {
        self.role == Role::Operator
    }

    #[must_use]
    pub fn is_client(&self) -> bool {
        self.role == Role::Client
    }

    /// Whether the session's validity window covers `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// The actor view of this session for policy evaluation.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

/// The identity and role a policy decision is made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl From<&Session> for Actor {
    fn from(session: &Session) -> Self {
        session.actor()
    }
}
