// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Fixtrack repair-ticket core.

use thiserror::Error;

use crate::types::TicketStatus;

/// The primary error type used across all Fixtrack trait seams and core operations.
///
/// Every failure crossing the core boundary is one of these kinds with a
/// human-readable detail; raw storage or transport errors never leak past
/// the `Storage` carrier.
#[derive(Debug, Error)]
pub enum FixtrackError {
    /// No active session, or the presented token is invalid or expired.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The authorization policy denied this actor this action. Hard deny,
    /// never silently degraded.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Input failed validation (empty required field, malformed value).
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested change is not legal from the ticket's current status:
    /// either the status change is outside the legal-transition table, or
    /// the ticket is in a terminal status and `to` is absent because no
    /// status change was requested at all.
    #[error("invalid transition: {}", render_transition(.from, .to))]
    InvalidTransition {
        from: TicketStatus,
        to: Option<TicketStatus>,
    },

    /// An entity reference did not resolve.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The store detected a concurrent modification. Safe to retry after
    /// re-reading current state; the core never auto-retries.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A store call exceeded its caller-supplied deadline. No partial
    /// mutation is guaranteed to have occurred.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),
}

fn render_transition(from: &TicketStatus, to: &Option<TicketStatus>) -> String {
    match to {
        Some(to) => format!("{from} -> {to}"),
        None => format!("ticket is {from} and accepts no further changes"),
    }
}

impl FixtrackError {
    /// Shorthand for a status change outside the legal-transition table.
    #[must_use]
    pub fn invalid_transition(from: TicketStatus, to: TicketStatus) -> Self {
        Self::InvalidTransition { from, to: Some(to) }
    }

    /// Rejection of any mutation against a ticket in a terminal status.
    #[must_use]
    pub fn closed_ticket(status: TicketStatus) -> Self {
        Self::InvalidTransition {
            from: status,
            to: None,
        }
    }

    /// Whether the caller may retry the failed operation as-is.
    ///
    /// Only `Conflict` (after re-reading current state) and `Timeout` are
    /// retry-safe; everything else requires corrected input or a new session.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Timeout { .. })
    }

    /// Shorthand for a `NotFound` against a numeric entity id.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_render_kind_and_detail() {
        let err = FixtrackError::Forbidden("client may not manage users".into());
        assert_eq!(err.to_string(), "forbidden: client may not manage users");

        let err = FixtrackError::invalid_transition(TicketStatus::Completed, TicketStatus::InRepair);
        assert_eq!(
            err.to_string(),
            "invalid transition: Completed -> InRepair"
        );

        // Closed-ticket rejections name no target status: none was requested.
        let err = FixtrackError::closed_ticket(TicketStatus::Completed);
        assert_eq!(
            err.to_string(),
            "invalid transition: ticket is Completed and accepts no further changes"
        );

        let err = FixtrackError::not_found("user", 42);
        assert_eq!(err.to_string(), "user not found: 42");
    }

    #[test]
    fn only_conflict_and_timeout_are_retryable() {
        assert!(FixtrackError::Conflict("stale version".into()).is_retryable());
        assert!(
            FixtrackError::Timeout {
                duration: std::time::Duration::from_secs(5)
            }
            .is_retryable()
        );

        assert!(!FixtrackError::Unauthenticated("no session".into()).is_retryable());
        assert!(!FixtrackError::Forbidden("denied".into()).is_retryable());
        assert!(!FixtrackError::Validation("empty".into()).is_retryable());
        assert!(!FixtrackError::not_found("ticket", 1).is_retryable());
    }
}
