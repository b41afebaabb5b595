// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manager-only user management.
//!
//! Creation and hard deletion are gated by `ManageUsers`. Passwords are
//! hashed behind the `PasswordHasher` seam before they reach the store;
//! the service never sees or keeps plaintext beyond the call.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use fixtrack_core::{
    FixtrackError, NewUser, PasswordHasher, Role, Session, User, UserId, UserStore,
};
use fixtrack_policy::{require, Action};

use crate::checks::{ensure_active, non_empty};
use crate::timeout::with_deadline;

/// Minimum length for logins and passwords, counted in characters.
const MIN_CREDENTIAL_LEN: usize = 3;

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub display_name: String,
    pub login: String,
    pub phone: String,
    pub role: Role,
    pub password: String,
}

/// The user-management service.
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    op_timeout: Duration,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        op_timeout: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            op_timeout,
        }
    }

    /// Creates a user account. Manager only.
    ///
    /// Fails with `Validation` on empty fields, too-short credentials, or
    /// a login that is already taken.
    pub async fn create_user(
        &self,
        session: &Session,
        draft: UserDraft,
    ) -> Result<User, FixtrackError> {
        ensure_active(session)?;
        require(&session.actor(), Action::ManageUsers, None)?;

        let display_name = non_empty("display name", &draft.display_name)?;
        let phone = non_empty("phone", &draft.phone)?;
        let login = non_empty("login", &draft.login)?;
        let password = non_empty("password", &draft.password)?;

        if login.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(FixtrackError::Validation(format!(
                "login must be at least {MIN_CREDENTIAL_LEN} characters"
            )));
        }
        if password.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(FixtrackError::Validation(format!(
                "password must be at least {MIN_CREDENTIAL_LEN} characters"
            )));
        }

        let existing = with_deadline(self.op_timeout, self.users.get_user_by_login(&login)).await?;
        if existing.is_some() {
            return Err(FixtrackError::Validation(format!(
                "login already in use: {login}"
            )));
        }

        let password_hash = self.hasher.hash_password(&password)?;
        let user = with_deadline(
            self.op_timeout,
            self.users.insert_user(&NewUser {
                display_name,
                login,
                phone,
                role: draft.role,
                password_hash,
            }),
        )
        .await?;

        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    /// Hard-deletes a user account. Manager only; self-deletion is refused.
    pub async fn delete_user(&self, session: &Session, id: UserId) -> Result<(), FixtrackError> {
        ensure_active(session)?;
        let actor = session.actor();
        require(&actor, Action::ManageUsers, None)?;

        if id == actor.user_id {
            return Err(FixtrackError::Forbidden(
                "a user may not delete themselves".into(),
            ));
        }

        let deleted = with_deadline(self.op_timeout, self.users.delete_user(id)).await?;
        if !deleted {
            return Err(FixtrackError::not_found("user", id));
        }

        info!(user_id = %id, deleted_by = %actor.user_id, "user deleted");
        Ok(())
    }

    /// Lists user accounts, optionally by role. Manager only.
    pub async fn list_users(
        &self,
        session: &Session,
        role: Option<Role>,
    ) -> Result<Vec<User>, FixtrackError> {
        ensure_active(session)?;
        require(&session.actor(), Action::ManageUsers, None)?;
        with_deadline(self.op_timeout, self.users.list_users(role)).await
    }

    /// The assignment pick-list: all technicians, ordered by display name.
    /// Available to anyone who may assign.
    pub async fn list_technicians(&self, session: &Session) -> Result<Vec<User>, FixtrackError> {
        ensure_active(session)?;
        require(&session.actor(), Action::AssignTechnician, None)?;
        with_deadline(self.op_timeout, self.users.list_users(Some(Role::Technician))).await
    }
}
