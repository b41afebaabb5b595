// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket lifecycle service: creation, transitions, assignment, comments,
//! and role-scoped reads.
//!
//! Every mutation is read-modify-write as one unit against the versioned
//! store. A stale version surfaces `Conflict`; the service never retries on
//! the caller's behalf.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use fixtrack_core::{
    Comment, CommentKind, CommentStore, FixtrackError, NewComment, NewTicket, Role, Session,
    Ticket, TicketFilter, TicketId, TicketStatus, TicketStore, UserId, UserStore,
};
use fixtrack_policy::{require, Action};

use crate::checks::{ensure_active, non_empty};
use crate::stats::{self, Statistics};
use crate::timeout::with_deadline;

/// Input for filing a new repair ticket.
#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub device_category: String,
    pub device_model: String,
    pub problem_description: String,
    pub client_id: UserId,
}

/// Caller-facing listing constraints. Role scoping is applied on top:
/// clients only ever see their own tickets, technicians default to their
/// assigned ones.
#[derive(Debug, Clone, Default)]
pub struct TicketQuery {
    pub status: Option<TicketStatus>,
    /// Exact-id search, mirroring the intake desk's "find by number".
    pub search_id: Option<TicketId>,
}

/// The repair-ticket workflow service.
pub struct TicketService {
    tickets: Arc<dyn TicketStore>,
    users: Arc<dyn UserStore>,
    comments: Arc<dyn CommentStore>,
    op_timeout: Duration,
}

impl TicketService {
    /// Creates a service over the given store seams. `op_timeout` bounds
    /// every individual store call.
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        users: Arc<dyn UserStore>,
        comments: Arc<dyn CommentStore>,
        op_timeout: Duration,
    ) -> Self {
        Self {
            tickets,
            users,
            comments,
            op_timeout,
        }
    }

    /// Files a new ticket in `New` status, unassigned, with no completion
    /// timestamp.
    ///
    /// Fails with `Validation` on empty fields, `Forbidden` unless the
    /// actor is intake staff, and `NotFound` if `client_id` does not
    /// resolve to a user with role `Client`.
    pub async fn create_ticket(
        &self,
        session: &Session,
        draft: TicketDraft,
    ) -> Result<Ticket, FixtrackError> {
        ensure_active(session)?;
        let actor = session.actor();
        require(&actor, Action::CreateTicket, None)?;

        let device_category = non_empty("device category", &draft.device_category)?;
        let device_model = non_empty("device model", &draft.device_model)?;
        let problem_description = non_empty("problem description", &draft.problem_description)?;

        let client = with_deadline(self.op_timeout, self.users.get_user(draft.client_id))
            .await?
            .filter(|u| u.role == Role::Client)
            .ok_or_else(|| FixtrackError::not_found("client", draft.client_id))?;

        let ticket = with_deadline(
            self.op_timeout,
            self.tickets.insert_ticket(&NewTicket {
                device_category,
                device_model,
                problem_description,
                client_id: client.id,
                created_at: Utc::now(),
            }),
        )
        .await?;

        info!(
            ticket_id = %ticket.id,
            client_id = %ticket.client_id,
            created_by = %actor.user_id,
            "ticket created"
        );
        Ok(ticket)
    }

    /// Moves a ticket to `new_status` along the legal-transition table.
    ///
    /// On success the status is committed through the versioned store, the
    /// completion timestamp is stamped when entering `Completed`, and an
    /// audit note is appended to the ticket's comment log.
    pub async fn transition(
        &self,
        session: &Session,
        id: TicketId,
        new_status: TicketStatus,
    ) -> Result<Ticket, FixtrackError> {
        ensure_active(session)?;
        let actor = session.actor();

        let ticket = self.fetch(id).await?;
        require(&actor, Action::TransitionStatus, Some(&ticket))?;

        let from = ticket.status;
        if !from.can_transition_to(new_status) {
            return Err(FixtrackError::invalid_transition(from, new_status));
        }

        let mut updated = ticket;
        updated.status = new_status;
        if new_status == TicketStatus::Completed {
            updated.completed_at = Some(Utc::now());
        }

        // The status commit and its audit note are one storage unit, so the
        // comment log always reconstructs the full status history. A failed
        // commit leaves neither behind.
        let note = NewComment {
            ticket_id: updated.id,
            author_id: actor.user_id,
            kind: CommentKind::Audit,
            message: format!("status changed: {from} -> {new_status}"),
            created_at: Utc::now(),
        };
        let (committed, _) = with_deadline(
            self.op_timeout,
            self.tickets.update_ticket_with_audit(&updated, &note),
        )
        .await?;

        info!(
            ticket_id = %committed.id,
            from = %from,
            to = %new_status,
            actor = %actor.user_id,
            "ticket transitioned"
        );
        Ok(committed)
    }

    /// Assigns a technician, or clears the assignment when `technician_id`
    /// is `None`. Clearing an already-clear assignment succeeds.
    ///
    /// Fails with `InvalidTransition` on a closed ticket and `NotFound` if
    /// the id does not resolve to a user with role `Technician`.
    pub async fn assign_technician(
        &self,
        session: &Session,
        id: TicketId,
        technician_id: Option<UserId>,
    ) -> Result<Ticket, FixtrackError> {
        ensure_active(session)?;
        let actor = session.actor();

        let ticket = self.fetch(id).await?;
        require(&actor, Action::AssignTechnician, Some(&ticket))?;

        if ticket.status == TicketStatus::Completed {
            return Err(FixtrackError::closed_ticket(ticket.status));
        }

        if let Some(tech_id) = technician_id {
            with_deadline(self.op_timeout, self.users.get_user(tech_id))
                .await?
                .filter(|u| u.role == Role::Technician)
                .ok_or_else(|| FixtrackError::not_found("technician", tech_id))?;
        }

        let mut updated = ticket;
        updated.technician_id = technician_id;
        let committed = with_deadline(self.op_timeout, self.tickets.update_ticket(&updated)).await?;

        info!(
            ticket_id = %committed.id,
            technician_id = ?technician_id.map(|t| t.0),
            actor = %actor.user_id,
            "technician assignment updated"
        );
        Ok(committed)
    }

    /// Appends a staff comment to the ticket's log.
    pub async fn add_comment(
        &self,
        session: &Session,
        id: TicketId,
        message: &str,
    ) -> Result<Comment, FixtrackError> {
        ensure_active(session)?;
        let actor = session.actor();

        let ticket = self.fetch(id).await?;
        require(&actor, Action::AddComment, Some(&ticket))?;
        let message = non_empty("comment message", message)?;

        let comment = with_deadline(
            self.op_timeout,
            self.comments.append_comment(&NewComment {
                ticket_id: ticket.id,
                author_id: actor.user_id,
                kind: CommentKind::User,
                message,
                created_at: Utc::now(),
            }),
        )
        .await?;

        debug!(
            ticket_id = %ticket.id,
            comment_id = %comment.id,
            author = %actor.user_id,
            "comment appended"
        );
        Ok(comment)
    }

    /// Returns a ticket's comment log in ascending creation order.
    pub async fn comments(
        &self,
        session: &Session,
        id: TicketId,
    ) -> Result<Vec<Comment>, FixtrackError> {
        ensure_active(session)?;
        let actor = session.actor();

        let ticket = self.fetch(id).await?;
        require(&actor, Action::ViewTicket, Some(&ticket))?;

        with_deadline(self.op_timeout, self.comments.comments_for_ticket(ticket.id)).await
    }

    /// Fetches a single ticket, applying the view policy.
    pub async fn get_ticket(&self, session: &Session, id: TicketId) -> Result<Ticket, FixtrackError> {
        ensure_active(session)?;
        let actor = session.actor();

        let ticket = self.fetch(id).await?;
        require(&actor, Action::ViewTicket, Some(&ticket))?;
        Ok(ticket)
    }

    /// Lists tickets, newest first, scoped to the caller's role: clients
    /// see only their own tickets, technicians their assigned ones, and
    /// managers and operators everything.
    pub async fn list_tickets(
        &self,
        session: &Session,
        query: &TicketQuery,
    ) -> Result<Vec<Ticket>, FixtrackError> {
        ensure_active(session)?;
        let actor = session.actor();

        // The role scope below enforces the client-ownership rule; staff
        // pass the plain view grant.
        if actor.role.is_staff() {
            require(&actor, Action::ViewTicket, None)?;
        }

        let mut filter = TicketFilter {
            id: query.search_id,
            status: query.status,
            ..TicketFilter::default()
        };
        match actor.role {
            Role::Client => filter.client_id = Some(actor.user_id),
            Role::Technician => filter.technician_id = Some(actor.user_id),
            Role::Manager | Role::Operator => {}
        }

        with_deadline(self.op_timeout, self.tickets.list_tickets(&filter)).await
    }

    /// Workshop statistics: totals, completion times, per-category counts,
    /// and technician workload. Manager only.
    pub async fn statistics(&self, session: &Session) -> Result<Statistics, FixtrackError> {
        ensure_active(session)?;
        let actor = session.actor();
        require(&actor, Action::ViewStatistics, None)?;

        let tickets =
            with_deadline(self.op_timeout, self.tickets.list_tickets(&TicketFilter::default()))
                .await?;
        let technicians =
            with_deadline(self.op_timeout, self.users.list_users(Some(Role::Technician))).await?;

        Ok(stats::compute(&tickets, &technicians))
    }

    async fn fetch(&self, id: TicketId) -> Result<Ticket, FixtrackError> {
        with_deadline(self.op_timeout, self.tickets.get_ticket(id))
            .await?
            .ok_or_else(|| FixtrackError::not_found("ticket", id))
    }
}
