// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The grant table and its evaluator.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::warn;

use fixtrack_core::{Actor, FixtrackError, Role, Ticket};

/// Every operation the policy gates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CreateTicket,
    ViewTicket,
    TransitionStatus,
    AssignTechnician,
    AddComment,
    ManageUsers,
    ViewStatistics,
}

#[derive(Debug, Clone, Copy)]
struct GrantSpec {
    action: Action,
    roles: &'static [Role],
}

/// The grant table. `ViewTicket` grants every authenticated role here and
/// applies the client-ownership rule separately in [`can_perform`].
const GRANTS: &[GrantSpec] = &[
    GrantSpec {
        action: Action::CreateTicket,
        roles: &[Role::Manager, Role::Operator],
    },
    GrantSpec {
        action: Action::ViewTicket,
        roles: &[Role::Manager, Role::Technician, Role::Operator, Role::Client],
    },
    GrantSpec {
        action: Action::TransitionStatus,
        roles: &[Role::Manager, Role::Technician],
    },
    GrantSpec {
        action: Action::AssignTechnician,
        roles: &[Role::Manager, Role::Technician],
    },
    GrantSpec {
        action: Action::AddComment,
        roles: &[Role::Manager, Role::Technician],
    },
    GrantSpec {
        action: Action::ManageUsers,
        roles: &[Role::Manager],
    },
    GrantSpec {
        action: Action::ViewStatistics,
        roles: &[Role::Manager],
    },
];

fn granted_roles(action: Action) -> &'static [Role] {
    GRANTS
        .iter()
        .find(|grant| grant.action == action)
        .map(|grant| grant.roles)
        .unwrap_or(&[])
}

/// Pure predicate: may this actor perform this action, possibly against
/// this ticket?
///
/// `ticket` matters only for `ViewTicket` by a client: ownership must be
/// provable, so a client with no ticket in hand is denied.
#[must_use]
pub fn can_perform(actor: &Actor, action: Action, ticket: Option<&Ticket>) -> bool {
    if !granted_roles(action).contains(&actor.role) {
        return false;
    }
    if action == Action::ViewTicket && actor.role == Role::Client {
        return ticket.is_some_and(|t| t.client_id == actor.user_id);
    }
    true
}

/// Gate an operation on the policy, surfacing `Forbidden` with detail on
/// denial.
pub fn require(actor: &Actor, action: Action, ticket: Option<&Ticket>) -> Result<(), FixtrackError> {
    if can_perform(actor, action, ticket) {
        return Ok(());
    }
    warn!(
        user_id = %actor.user_id,
        role = %actor.role,
        action = %action,
        "policy denied action"
    );
    Err(FixtrackError::Forbidden(format!(
        "{} may not {}",
        actor.role, action
    )))
}
