// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User account CRUD operations.

use rusqlite::params;

use fixtrack_core::{FixtrackError, NewUser, Role, User, UserId};

use crate::database::{map_constraint_err, map_tr_err, Database};

use super::parse_enum;

const USER_COLUMNS: &str = "user_id, display_name, login, phone, role, password_hash";

/// Insert a new user. A duplicate login trips the UNIQUE constraint and
/// surfaces as `Conflict`.
pub async fn insert_user(db: &Database, user: &NewUser) -> Result<User, FixtrackError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (display_name, login, phone, role, password_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.display_name,
                    user.login,
                    user.phone,
                    user.role.to_string(),
                    user.password_hash,
                ],
            )?;
            let id = UserId(conn.last_insert_rowid());
            Ok(User {
                id,
                display_name: user.display_name,
                login: user.login,
                phone: user.phone,
                role: user.role,
                password_hash: user.password_hash,
            })
        })
        .await
        .map_err(map_constraint_err)
}

/// Get a user by id.
pub async fn get_user(db: &Database, id: UserId) -> Result<Option<User>, FixtrackError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"
            ))?;
            let result = stmt.query_row(params![id.0], row_to_user);
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Get a user by unique login.
pub async fn get_user_by_login(db: &Database, login: &str) -> Result<Option<User>, FixtrackError> {
    let login = login.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE login = ?1"
            ))?;
            let result = stmt.query_row(params![login], row_to_user);
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List users, optionally restricted to one role, ordered by display name.
pub async fn list_users(db: &Database, role: Option<Role>) -> Result<Vec<User>, FixtrackError> {
    db.connection()
        .call(move |conn| {
            let mut users = Vec::new();
            match role {
                Some(role) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {USER_COLUMNS} FROM users WHERE role = ?1
                         ORDER BY display_name, user_id"
                    ))?;
                    let rows = stmt.query_map(params![role.to_string()], row_to_user)?;
                    for row in rows {
                        users.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {USER_COLUMNS} FROM users ORDER BY display_name, user_id"
                    ))?;
                    let rows = stmt.query_map([], row_to_user)?;
                    for row in rows {
                        users.push(row?);
                    }
                }
            }
            Ok(users)
        })
        .await
        .map_err(map_tr_err)
}

/// Hard-delete a user. Returns `false` if no such user existed. Deleting a
/// user still referenced by a ticket or comment surfaces as `Conflict`.
pub async fn delete_user(db: &Database, id: UserId) -> Result<bool, FixtrackError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute("DELETE FROM users WHERE user_id = ?1", params![id.0])?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_constraint_err)
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(4)?;
    Ok(User {
        id: UserId(row.get(0)?),
        display_name: row.get(1)?,
        login: row.get(2)?,
        phone: row.get(3)?,
        role: parse_enum(4, &role)?,
        password_hash: row.get(5)?,
    })
}
