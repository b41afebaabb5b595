// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use tokio_rusqlite::Connection;
use tracing::debug;

use fixtrack_core::FixtrackError;

/// Handle to the SQLite database behind an async connection.
///
/// Opening runs PRAGMA setup and all pending migrations before the handle
/// is returned, so a `Database` in hand is always fully migrated.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled.
    pub async fn open(path: &str) -> Result<Self, FixtrackError> {
        Self::open_with(path, true).await
    }

    /// Open (or create) the database at `path`, optionally without WAL.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, FixtrackError> {
        // Journal mode and migrations run on a short-lived blocking handle;
        // it is dropped before the async connection takes over as the sole
        // writer.
        {
            let mut conn = rusqlite::Connection::open(path).map_err(map_sql_err)?;
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(map_sql_err)?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")
                .map_err(map_sql_err)?;
            crate::migrations::run_migrations(&mut conn)?;
        }

        let conn = Connection::open(path).await.map_err(map_sql_err)?;
        conn.call(|conn| {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL. Safe to call on a non-WAL database.
    pub async fn close(&self) -> Result<(), FixtrackError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Wrap a tokio-rusqlite error in the storage error carrier.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> FixtrackError {
    FixtrackError::Storage {
        source: Box::new(e),
    }
}

/// Wrap a bare rusqlite error in the storage error carrier.
pub(crate) fn map_sql_err(e: rusqlite::Error) -> FixtrackError {
    FixtrackError::Storage {
        source: Box::new(e),
    }
}

/// Like [`map_tr_err`], but surfaces SQLite constraint violations (unique
/// login, foreign keys) as `Conflict` so callers can tell them apart from
/// infrastructure failures.
pub(crate) fn map_constraint_err(e: tokio_rusqlite::Error) -> FixtrackError {
    if let tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(f, _)) = &e {
        if f.code == rusqlite::ErrorCode::ConstraintViolation {
            return FixtrackError::Conflict(format!("constraint violated: {e}"));
        }
    }
    map_tr_err(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_and_migrates() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("open.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        // All three tables exist after migration.
        let tables: Vec<String> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                let mut names = Vec::new();
                for row in rows {
                    names.push(row?);
                }
                Ok::<_, rusqlite::Error>(names)
            })
            .await
            .unwrap();
        for table in ["users", "tickets", "comments"] {
            assert!(tables.iter().any(|t| t == table), "missing table {table}");
        }

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
        drop(db);

        // Second open re-runs the migration runner, which must be a no-op.
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_without_wal() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nowal.db");
        let db = Database::open_with(db_path.to_str().unwrap(), false)
            .await
            .unwrap();
        db.close().await.unwrap();
    }
}
