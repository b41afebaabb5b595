// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow services for the Fixtrack repair-ticket core.
//!
//! [`TicketService`] owns the ticket lifecycle: creation, status
//! transitions with audit notes, technician assignment, comments, and
//! role-scoped reads. [`UserService`] owns Manager-only user management.
//! Both gate every operation through the authorization policy and commit
//! mutations through the versioned store seams, so concurrent writers
//! surface `Conflict` instead of silently overwriting each other.

mod checks;
pub mod stats;
pub mod tickets;
pub mod timeout;
pub mod users;

pub use stats::{CategoryCount, Statistics, TechnicianWorkload};
pub use tickets::{TicketDraft, TicketQuery, TicketService};
pub use users::{UserDraft, UserService};
