// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence trait seams for tickets, users, and comments.
//!
//! The workflow layer talks only to these traits; the SQLite backend and
//! the in-memory test stores are interchangeable behind them. The store is
//! expected to distinguish "conflict" vs "not found" vs "validation
//! failure": the error kinds the core's contracts depend on.

use async_trait::async_trait;

use crate::error::FixtrackError;
use crate::types::{
    Comment, NewComment, NewTicket, NewUser, Role, Ticket, TicketFilter, TicketId, User, UserId,
};

/// Ticket persistence.
///
/// Mutations are read-modify-write as one unit: `update_ticket` commits only
/// when the caller's `version` matches the stored row, and fails with
/// `Conflict` when another writer got there first. Tickets are never
/// deleted; there is deliberately no delete operation on this trait.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Inserts a new ticket and returns it with its server-assigned id,
    /// `New` status, and version 0.
    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<Ticket, FixtrackError>;

    /// Fetches a ticket by id.
    async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, FixtrackError>;

    /// Lists tickets matching the filter, newest first.
    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, FixtrackError>;

    /// Commits a full-row update if `ticket.version` still matches the
    /// stored row, returning the row with its bumped version.
    ///
    /// Fails with `Conflict` on a stale version and `NotFound` if the row
    /// is gone.
    async fn update_ticket(&self, ticket: &Ticket) -> Result<Ticket, FixtrackError>;

    /// Commits a versioned full-row update together with an audit note as
    /// one atomic unit: either both are durable or neither is. Same
    /// version contract as [`update_ticket`](TicketStore::update_ticket);
    /// a rejected update leaves no note behind.
    async fn update_ticket_with_audit(
        &self,
        ticket: &Ticket,
        note: &NewComment,
    ) -> Result<(Ticket, Comment), FixtrackError>;
}

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user and returns it with its server-assigned id.
    async fn insert_user(&self, user: &NewUser) -> Result<User, FixtrackError>;

    /// Fetches a user by id.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, FixtrackError>;

    /// Fetches a user by unique login.
    async fn get_user_by_login(&self, login: &str) -> Result<Option<User>, FixtrackError>;

    /// Lists users, optionally restricted to one role, ordered by display name.
    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, FixtrackError>;

    /// Hard-deletes a user. Returns `false` if no such user existed.
    async fn delete_user(&self, id: UserId) -> Result<bool, FixtrackError>;
}

/// Append-only comment persistence.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Appends an immutable comment record, returning it with its assigned
    /// id and timestamp.
    async fn append_comment(&self, comment: &NewComment) -> Result<Comment, FixtrackError>;

    /// Returns all comments for a ticket in ascending creation order.
    ///
    /// Always a full, finite, restartable read; no pagination cursor state
    /// is retained by the store.
    async fn comments_for_ticket(&self, id: TicketId) -> Result<Vec<Comment>, FixtrackError>;
}
