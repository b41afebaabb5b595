// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Fixtrack workspace.
//!
//! Statuses and roles are closed enumerations; anything outside them is
//! rejected at the boundary by `FromStr`. Entity ids are server-assigned
//! and wrapped in newtypes so they cannot be mixed up at call sites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Unique identifier for a repair ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(pub i64);

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Unique identifier for a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub i64);

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User role, determining permitted actions via the authorization policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum Role {
    Manager,
    Technician,
    Operator,
    Client,
}

impl Role {
    /// Staff roles are everyone except clients.
    #[must_use]
    pub fn is_staff(self) -> bool {
        self != Role::Client
    }
}

/// Repair ticket lifecycle status.
///
/// `New` is the initial state; `Completed` is terminal with no outgoing
/// transitions. The legal-transition table is the single source of truth
/// for status changes; see [`TicketStatus::allowed_transitions`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum TicketStatus {
    New,
    InRepair,
    AwaitingParts,
    ReadyForPickup,
    Completed,
}

impl TicketStatus {
    /// The set of statuses this status may legally transition to.
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [TicketStatus] {
        use TicketStatus::*;
        match self {
            New => &[InRepair, AwaitingParts, ReadyForPickup, Completed],
            InRepair => &[AwaitingParts, ReadyForPickup, Completed],
            AwaitingParts => &[InRepair, ReadyForPickup, Completed],
            ReadyForPickup => &[InRepair, Completed],
            Completed => &[],
        }
    }

    /// Whether `target` is a legal next status from this one.
    #[must_use]
    pub fn can_transition_to(self, target: TicketStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Terminal statuses have no outgoing transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

/// A repair request tracking a device through intake to completion.
///
/// Tickets are never physically deleted; they only move through the status
/// table until they reach a terminal state. `version` is the optimistic
/// concurrency token bumped by the store on every committed write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub device_category: String,
    pub device_model: String,
    pub problem_description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    /// Set if and only if `status == Completed`.
    pub completed_at: Option<DateTime<Utc>>,
    pub technician_id: Option<UserId>,
    /// The client this repair is for. Set at creation, immutable.
    pub client_id: UserId,
    pub version: i64,
}

impl Ticket {
    /// Checks the completion-timestamp invariant: `completed_at` is set
    /// exactly when the ticket is `Completed`.
    #[must_use]
    pub fn completion_consistent(&self) -> bool {
        self.completed_at.is_some() == (self.status == TicketStatus::Completed)
    }
}

/// Payload for creating a ticket. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    pub device_category: String,
    pub device_model: String,
    pub problem_description: String,
    pub client_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Filter for ticket listings. All fields are conjunctive; `None` means
/// no constraint on that field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFilter {
    pub id: Option<TicketId>,
    pub status: Option<TicketStatus>,
    pub client_id: Option<UserId>,
    pub technician_id: Option<UserId>,
}

/// A user account. `password_hash` is opaque to the core; hashing and
/// verification live behind the `PasswordHasher` seam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub login: String,
    pub phone: String,
    pub role: Role,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Payload for creating a user. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub display_name: String,
    pub login: String,
    pub phone: String,
    pub role: Role,
    pub password_hash: String,
}

/// Distinguishes operator-written comments from machine-appended audit
/// notes. Both live in the same append-only log and share ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum CommentKind {
    User,
    Audit,
}

/// An append-only annotation on a ticket. No edit, no delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub ticket_id: TicketId,
    pub author_id: UserId,
    pub kind: CommentKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a comment. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub ticket_id: TicketId,
    pub author_id: UserId,
    pub kind: CommentKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Health status reported by backend health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend is fully operational.
    Healthy,
    /// Backend is operational but experiencing issues.
    Degraded(String),
    /// Backend is not operational.
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn transition_table_matches_lifecycle() {
        use TicketStatus::*;

        assert_eq!(
            New.allowed_transitions(),
            &[InRepair, AwaitingParts, ReadyForPickup, Completed]
        );
        assert_eq!(
            InRepair.allowed_transitions(),
            &[AwaitingParts, ReadyForPickup, Completed]
        );
        assert_eq!(
            AwaitingParts.allowed_transitions(),
            &[InRepair, ReadyForPickup, Completed]
        );
        assert_eq!(ReadyForPickup.allowed_transitions(), &[InRepair, Completed]);
        assert!(Completed.allowed_transitions().is_empty());
    }

    #[test]
    fn ready_for_pickup_cannot_return_to_awaiting_parts() {
        assert!(!TicketStatus::ReadyForPickup.can_transition_to(TicketStatus::AwaitingParts));
    }

    #[test]
    fn completed_is_the_only_terminal_status() {
        for status in TicketStatus::iter() {
            assert_eq!(
                status.is_terminal(),
                status == TicketStatus::Completed,
                "{status} terminality"
            );
        }
    }

    #[test]
    fn status_and_role_round_trip_through_strings() {
        for status in TicketStatus::iter() {
            let parsed = TicketStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(status, parsed);
        }
        for role in Role::iter() {
            let parsed = Role::from_str(&role.to_string()).unwrap();
            assert_eq!(role, parsed);
        }
        assert!(TicketStatus::from_str("Broken").is_err());
        assert!(Role::from_str("Admin").is_err());
    }

    #[test]
    fn only_clients_are_not_staff() {
        assert!(Role::Manager.is_staff());
        assert!(Role::Technician.is_staff());
        assert!(Role::Operator.is_staff());
        assert!(!Role::Client.is_staff());
    }

    fn any_status() -> impl Strategy<Value = TicketStatus> {
        prop::sample::select(TicketStatus::iter().collect::<Vec<_>>())
    }

    proptest! {
        // No status may transition into itself, and nothing leaves Completed.
        #[test]
        fn no_self_transitions_and_completed_stays_closed(status in any_status()) {
            prop_assert!(!status.can_transition_to(status));
            prop_assert!(!TicketStatus::Completed.can_transition_to(status));
        }

        // Every non-terminal status can reach Completed in one step.
        #[test]
        fn every_open_status_can_complete(status in any_status()) {
            if !status.is_terminal() {
                prop_assert!(status.can_transition_to(TicketStatus::Completed));
            }
        }
    }
}
