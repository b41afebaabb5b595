// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the store traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use fixtrack_config::model::StorageConfig;
use fixtrack_core::{
    Backend, Comment, CommentStore, FixtrackError, HealthStatus, NewComment, NewTicket, NewUser,
    Role, Ticket, TicketFilter, TicketId, TicketStore, User, UserId, UserStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: SqliteStorage::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database at the configured path and run migrations.
    pub async fn initialize(&self) -> Result<(), FixtrackError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| FixtrackError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL ahead of process exit.
    pub async fn close(&self) -> Result<(), FixtrackError> {
        self.db()?.close().await
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, FixtrackError> {
        self.db.get().ok_or_else(|| FixtrackError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl Backend for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, FixtrackError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FixtrackError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for SqliteStorage {
    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<Ticket, FixtrackError> {
        queries::tickets::insert_ticket(self.db()?, ticket).await
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, FixtrackError> {
        queries::tickets::get_ticket(self.db()?, id).await
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, FixtrackError> {
        queries::tickets::list_tickets(self.db()?, filter).await
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<Ticket, FixtrackError> {
        queries::tickets::update_ticket(self.db()?, ticket).await
    }

    async fn update_ticket_with_audit(
        &self,
        ticket: &Ticket,
        note: &NewComment,
    ) -> Result<(Ticket, Comment), FixtrackError> {
        queries::tickets::update_ticket_with_audit(self.db()?, ticket, note).await
    }
}

#[async_trait]
impl UserStore for SqliteStorage {
    async fn insert_user(&self, user: &NewUser) -> Result<User, FixtrackError> {
        queries::users::insert_user(self.db()?, user).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, FixtrackError> {
        queries::users::get_user(self.db()?, id).await
    }

    async fn get_user_by_login(&self, login: &str) -> Result<Option<User>, FixtrackError> {
        queries::users::get_user_by_login(self.db()?, login).await
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, FixtrackError> {
        queries::users::list_users(self.db()?, role).await
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, FixtrackError> {
        queries::users::delete_user(self.db()?, id).await
    }
}

#[async_trait]
impl CommentStore for SqliteStorage {
    async fn append_comment(&self, comment: &NewComment) -> Result<Comment, FixtrackError> {
        queries::comments::append_comment(self.db()?, comment).await
    }

    async fn comments_for_ticket(&self, id: TicketId) -> Result<Vec<Comment>, FixtrackError> {
        queries::comments::comments_for_ticket(self.db()?, id).await
    }
}
