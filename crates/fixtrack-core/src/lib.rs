// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Fixtrack repair-ticket workflow.
//!
//! This crate provides the foundational domain types, error kinds, session
//! model, and trait seams used throughout the Fixtrack workspace. The
//! workflow, policy, storage, and auth crates all build on the definitions
//! here.

pub mod error;
pub mod session;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FixtrackError;
pub use session::{Actor, Session};
pub use types::{
    Comment, CommentId, CommentKind, HealthStatus, NewComment, NewTicket, NewUser, Role, Ticket,
    TicketFilter, TicketId, TicketStatus, User, UserId,
};

// Re-export the trait seams at crate root.
pub use traits::{Authenticator, Backend, CommentStore, PasswordHasher, TicketStore, UserStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_has_all_contract_kinds() {
        // The seven distinguishable error kinds the contracts depend on,
        // plus the storage and config carriers.
        let _unauth = FixtrackError::Unauthenticated("test".into());
        let _forbidden = FixtrackError::Forbidden("test".into());
        let _validation = FixtrackError::Validation("test".into());
        let _transition = FixtrackError::invalid_transition(TicketStatus::Completed, TicketStatus::New);
        let _not_found = FixtrackError::not_found("ticket", 1);
        let _conflict = FixtrackError::Conflict("test".into());
        let _timeout = FixtrackError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _storage = FixtrackError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _config = FixtrackError::Config("test".into());
    }

    #[test]
    fn trait_seams_are_object_safe() {
        // Each seam must support dynamic dispatch; if any trait loses object
        // safety, this test won't compile.
        fn _takes_ticket_store(_: &dyn TicketStore) {}
        fn _takes_user_store(_: &dyn UserStore) {}
        fn _takes_comment_store(_: &dyn CommentStore) {}
        fn _takes_authenticator(_: &dyn Authenticator) {}
        fn _takes_password_hasher(_: &dyn PasswordHasher) {}
        fn _takes_backend(_: &dyn Backend) {}
    }

    #[test]
    fn ticket_serialization_round_trips() {
        let ticket = Ticket {
            id: TicketId(1),
            device_category: "Laptop".into(),
            device_model: "X1".into(),
            problem_description: "Won't boot".into(),
            status: TicketStatus::New,
            created_at: chrono::Utc::now(),
            completed_at: None,
            technician_id: None,
            client_id: UserId(42),
            version: 0,
        };
        let json = serde_json::to_string(&ticket).unwrap();
        let parsed: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(ticket, parsed);
    }

    #[test]
    fn user_serialization_never_emits_password_hash() {
        let user = User {
            id: UserId(3),
            display_name: "Dana".into(),
            login: "dana".into(),
            phone: "+1-555-0100".into(),
            role: Role::Technician,
            password_hash: "opaque-hash".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("opaque-hash"));
    }
}
