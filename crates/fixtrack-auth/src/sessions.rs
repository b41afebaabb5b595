// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token session management.
//!
//! Tokens are opaque UUIDs held in an in-process table; there is no token
//! persistence, so a restart logs everyone out. Login failures are
//! deliberately indistinguishable: unknown login and wrong password both
//! return the same `Unauthenticated` message.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use fixtrack_core::{
    Authenticator, Backend, FixtrackError, HealthStatus, PasswordHasher, Session, UserStore,
};

const BAD_CREDENTIALS: &str = "unknown login or wrong password";

/// Issues and resolves bearer tokens against the user store.
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    ttl: TimeDelta,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionManager {
    /// Create a manager issuing sessions valid for `ttl`.
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>, ttl: Duration) -> Self {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        Self {
            users,
            hasher,
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Verify credentials and issue a fresh token and session.
    pub async fn login(
        &self,
        login: &str,
        password: &str,
    ) -> Result<(String, Session), FixtrackError> {
        let user = self
            .users
            .get_user_by_login(login)
            .await?
            .ok_or_else(|| FixtrackError::Unauthenticated(BAD_CREDENTIALS.into()))?;
        if !self.hasher.verify_password(password, &user.password_hash) {
            warn!(login, "failed login attempt");
            return Err(FixtrackError::Unauthenticated(BAD_CREDENTIALS.into()));
        }

        let now = Utc::now();
        let session = Session {
            user_id: user.id,
            role: user.role,
            issued_at: now,
            expires_at: now + self.ttl,
        };
        let token = Uuid::new_v4().to_string();

        let mut sessions = self.sessions.write().await;
        // Evict anything already past its window while we hold the lock.
        sessions.retain(|_, s| s.is_valid_at(now));
        sessions.insert(token.clone(), session.clone());

        info!(user_id = %user.id, role = %user.role, "login");
        Ok((token, session))
    }

    /// Destroy a session. Returns `false` if the token was not live.
    pub async fn logout(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token).is_some();
        if removed {
            debug!("logout");
        }
        removed
    }

    /// Number of currently live (unexpired) sessions.
    pub async fn active_sessions(&self) -> usize {
        let now = Utc::now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.is_valid_at(now))
            .count()
    }
}

#[async_trait]
impl Authenticator for SessionManager {
    async fn authenticate(&self, token: &str) -> Result<Session, FixtrackError> {
        let session = self
            .sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| FixtrackError::Unauthenticated("unknown token".into()))?;
        if !session.is_valid_at(Utc::now()) {
            self.sessions.write().await.remove(token);
            return Err(FixtrackError::Unauthenticated("session expired".into()));
        }
        Ok(session)
    }
}

#[async_trait]
impl Backend for SessionManager {
    fn name(&self) -> &str {
        "sessions"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, FixtrackError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FixtrackError> {
        let mut sessions = self.sessions.write().await;
        let dropped = sessions.len();
        sessions.clear();
        debug!(dropped, "session table cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fixtrack_core::{NewUser, Role};
    use fixtrack_test_utils::MemoryStore;

    use crate::hasher::Argon2Hasher;

    use super::*;

    async fn manager_with_user(ttl: Duration) -> SessionManager {
        let store = Arc::new(MemoryStore::new());
        let hasher = Arc::new(Argon2Hasher);
        store
            .insert_user(&NewUser {
                display_name: "Olive Park".to_string(),
                login: "olive".to_string(),
                phone: "+1-555-0100".to_string(),
                role: Role::Operator,
                password_hash: hasher.hash_password("opensesame").unwrap(),
            })
            .await
            .unwrap();
        SessionManager::new(store, hasher, ttl)
    }

    #[tokio::test]
    async fn login_issues_resolvable_token() {
        let manager = manager_with_user(Duration::from_secs(3600)).await;

        let (token, session) = manager.login("olive", "opensesame").await.unwrap();
        assert_eq!(session.role, Role::Operator);
        assert!(session.is_valid_at(Utc::now()));

        let resolved = manager.authenticate(&token).await.unwrap();
        assert_eq!(resolved, session);
        assert_eq!(manager.active_sessions().await, 1);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_login_are_indistinguishable() {
        let manager = manager_with_user(Duration::from_secs(3600)).await;

        let wrong_pw = manager.login("olive", "nope").await.unwrap_err();
        let wrong_login = manager.login("nobody", "opensesame").await.unwrap_err();
        assert_eq!(wrong_pw.to_string(), wrong_login.to_string());
        assert!(matches!(wrong_pw, FixtrackError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn logout_invalidates_token() {
        let manager = manager_with_user(Duration::from_secs(3600)).await;
        let (token, _) = manager.login("olive", "opensesame").await.unwrap();

        assert!(manager.logout(&token).await);
        assert!(!manager.logout(&token).await);

        let err = manager.authenticate(&token).await.unwrap_err();
        assert!(matches!(err, FixtrackError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_evicted() {
        let manager = manager_with_user(Duration::ZERO).await;
        let (token, _) = manager.login("olive", "opensesame").await.unwrap();

        let err = manager.authenticate(&token).await.unwrap_err();
        assert!(matches!(err, FixtrackError::Unauthenticated(_)));
        assert_eq!(manager.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn unknown_token_is_unauthenticated() {
        let manager = manager_with_user(Duration::from_secs(3600)).await;
        let err = manager.authenticate("no-such-token").await.unwrap_err();
        assert!(matches!(err, FixtrackError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn shutdown_drops_all_sessions() {
        let manager = manager_with_user(Duration::from_secs(3600)).await;
        manager.login("olive", "opensesame").await.unwrap();

        manager.shutdown().await.unwrap();
        assert_eq!(manager.active_sessions().await, 0);
    }
}
