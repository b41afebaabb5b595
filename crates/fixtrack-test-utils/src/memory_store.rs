// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the store traits.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use fixtrack_core::{
    Comment, CommentId, CommentKind, CommentStore, FixtrackError, NewComment, NewTicket, NewUser,
    Role, Ticket, TicketFilter, TicketId, TicketStatus, TicketStore, User, UserId, UserStore,
};

#[derive(Default)]
struct Inner {
    tickets: BTreeMap<i64, Ticket>,
    users: BTreeMap<i64, User>,
    comments: BTreeMap<i64, Comment>,
    next_ticket_id: i64,
    next_user_id: i64,
    next_comment_id: i64,
}

impl Inner {
    fn commit_versioned(&mut self, ticket: &Ticket) -> Result<Ticket, FixtrackError> {
        let Some(stored) = self.tickets.get_mut(&ticket.id.0) else {
            return Err(FixtrackError::not_found("ticket", ticket.id));
        };
        if stored.version != ticket.version {
            return Err(FixtrackError::Conflict(format!(
                "ticket {} was modified concurrently",
                ticket.id
            )));
        }
        let mut updated = ticket.clone();
        updated.version += 1;
        *stored = updated.clone();
        Ok(updated)
    }

    fn push_comment(&mut self, comment: &NewComment) -> Comment {
        self.next_comment_id += 1;
        let stored = Comment {
            id: CommentId(self.next_comment_id),
            ticket_id: comment.ticket_id,
            author_id: comment.author_id,
            kind: comment.kind,
            message: comment.message.clone(),
            created_at: comment.created_at,
        };
        self.comments.insert(stored.id.0, stored.clone());
        stored
    }
}

/// In-memory store implementing all three persistence seams.
///
/// `update_ticket` enforces the same version compare-and-swap the SQLite
/// backend does, so conflict paths are testable without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumps a ticket's stored version without going through the service,
    /// simulating a concurrent writer landing first.
    pub fn bump_version(&self, id: TicketId) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if let Some(ticket) = inner.tickets.get_mut(&id.0) {
            ticket.version += 1;
        }
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<Ticket, FixtrackError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.next_ticket_id += 1;
        let stored = Ticket {
            id: TicketId(inner.next_ticket_id),
            device_category: ticket.device_category.clone(),
            device_model: ticket.device_model.clone(),
            problem_description: ticket.problem_description.clone(),
            status: TicketStatus::New,
            created_at: ticket.created_at,
            completed_at: None,
            technician_id: None,
            client_id: ticket.client_id,
            version: 0,
        };
        inner.tickets.insert(stored.id.0, stored.clone());
        Ok(stored)
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, FixtrackError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.tickets.get(&id.0).cloned())
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, FixtrackError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .values()
            .filter(|t| filter.id.is_none_or(|id| t.id == id))
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| filter.client_id.is_none_or(|c| t.client_id == c))
            .filter(|t| filter.technician_id.is_none_or(|m| t.technician_id == Some(m)))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tickets)
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<Ticket, FixtrackError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.commit_versioned(ticket)
    }

    async fn update_ticket_with_audit(
        &self,
        ticket: &Ticket,
        note: &NewComment,
    ) -> Result<(Ticket, Comment), FixtrackError> {
        // One lock across both writes: a rejected update appends nothing.
        let mut inner = self.inner.lock().expect("memory store poisoned");
        let updated = inner.commit_versioned(ticket)?;
        let comment = inner.push_comment(note);
        Ok((updated, comment))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &NewUser) -> Result<User, FixtrackError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if inner.users.values().any(|u| u.login == user.login) {
            return Err(FixtrackError::Conflict(format!(
                "login already exists: {}",
                user.login
            )));
        }
        inner.next_user_id += 1;
        let stored = User {
            id: UserId(inner.next_user_id),
            display_name: user.display_name.clone(),
            login: user.login.clone(),
            phone: user.phone.clone(),
            role: user.role,
            password_hash: user.password_hash.clone(),
        };
        inner.users.insert(stored.id.0, stored.clone());
        Ok(stored)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, FixtrackError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.users.get(&id.0).cloned())
    }

    async fn get_user_by_login(&self, login: &str) -> Result<Option<User>, FixtrackError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.users.values().find(|u| u.login == login).cloned())
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, FixtrackError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        let mut users: Vec<User> = inner
            .users
            .values()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(users)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, FixtrackError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.users.remove(&id.0).is_some())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn append_comment(&self, comment: &NewComment) -> Result<Comment, FixtrackError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.push_comment(comment))
    }

    async fn comments_for_ticket(&self, id: TicketId) -> Result<Vec<Comment>, FixtrackError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        let mut comments: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| c.ticket_id == id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn sample_ticket() -> NewTicket {
        NewTicket {
            device_category: "Laptop".into(),
            device_model: "X1".into(),
            problem_description: "Won't boot".into(),
            client_id: UserId(42),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_version_zero() {
        let store = MemoryStore::new();
        let t1 = store.insert_ticket(&sample_ticket()).await.unwrap();
        let t2 = store.insert_ticket(&sample_ticket()).await.unwrap();
        assert_eq!(t1.id, TicketId(1));
        assert_eq!(t2.id, TicketId(2));
        assert_eq!(t1.version, 0);
        assert_eq!(t1.status, TicketStatus::New);
    }

    #[tokio::test]
    async fn stale_version_update_conflicts() {
        let store = MemoryStore::new();
        let ticket = store.insert_ticket(&sample_ticket()).await.unwrap();

        store.bump_version(ticket.id);

        let mut stale = ticket.clone();
        stale.status = TicketStatus::InRepair;
        let err = store.update_ticket(&stale).await.unwrap_err();
        assert!(matches!(err, FixtrackError::Conflict(_)));
    }

    fn audit_note(ticket_id: TicketId) -> NewComment {
        NewComment {
            ticket_id,
            author_id: UserId(7),
            kind: CommentKind::Audit,
            message: "status changed: New -> InRepair".into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn update_with_audit_commits_both() {
        let store = MemoryStore::new();
        let mut ticket = store.insert_ticket(&sample_ticket()).await.unwrap();

        ticket.status = TicketStatus::InRepair;
        let (updated, note) = store
            .update_ticket_with_audit(&ticket, &audit_note(ticket.id))
            .await
            .unwrap();
        assert_eq!(updated.version, 1);
        assert_eq!(note.kind, CommentKind::Audit);

        let log = store.comments_for_ticket(ticket.id).await.unwrap();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn stale_update_with_audit_appends_nothing() {
        let store = MemoryStore::new();
        let ticket = store.insert_ticket(&sample_ticket()).await.unwrap();

        store.bump_version(ticket.id);

        let mut stale = ticket.clone();
        stale.status = TicketStatus::InRepair;
        let err = store
            .update_ticket_with_audit(&stale, &audit_note(ticket.id))
            .await
            .unwrap_err();
        assert!(matches!(err, FixtrackError::Conflict(_)));

        // The rejected update left no trace in the log.
        let log = store.comments_for_ticket(ticket.id).await.unwrap();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn duplicate_login_is_rejected() {
        let store = MemoryStore::new();
        let user = NewUser {
            display_name: "Dana".into(),
            login: "dana".into(),
            phone: "+1-555-0100".into(),
            role: Role::Technician,
            password_hash: "hash".into(),
        };
        store.insert_user(&user).await.unwrap();
        let err = store.insert_user(&user).await.unwrap_err();
        assert!(matches!(err, FixtrackError::Conflict(_)));
    }
}
