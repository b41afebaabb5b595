// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workshop statistics derived from the ticket list.
//!
//! "Active" for workload purposes means the ticket is still on the bench
//! (`New`, `InRepair`, `AwaitingParts`); `ReadyForPickup` and `Completed`
//! count as finished work.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fixtrack_core::{Ticket, TicketStatus, User, UserId};

/// Ticket counts per device category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub device_category: String,
    pub total_tickets: u64,
}

/// Per-technician active vs finished ticket counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianWorkload {
    pub technician_id: UserId,
    pub display_name: String,
    pub active_tickets: u64,
    pub finished_tickets: u64,
}

/// Aggregate workshop statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_tickets: u64,
    pub completed_tickets: u64,
    pub technician_count: u64,
    /// Mean days from intake to completion across completed tickets;
    /// zero when nothing has completed yet.
    pub average_completion_days: f64,
    pub by_category: Vec<CategoryCount>,
    pub technician_workload: Vec<TechnicianWorkload>,
}

fn is_active(status: TicketStatus) -> bool {
    matches!(
        status,
        TicketStatus::New | TicketStatus::InRepair | TicketStatus::AwaitingParts
    )
}

/// Computes statistics from a full ticket listing and the technician roster.
#[must_use]
pub fn compute(tickets: &[Ticket], technicians: &[User]) -> Statistics {
    let total_tickets = tickets.len() as u64;
    let completed_tickets = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Completed)
        .count() as u64;

    let completion_days: Vec<f64> = tickets
        .iter()
        .filter_map(|t| t.completed_at.map(|done| done - t.created_at))
        .map(|elapsed| elapsed.num_seconds() as f64 / 86_400.0)
        .collect();
    let average_completion_days = if completion_days.is_empty() {
        0.0
    } else {
        completion_days.iter().sum::<f64>() / completion_days.len() as f64
    };

    let mut categories: BTreeMap<&str, u64> = BTreeMap::new();
    for ticket in tickets {
        *categories.entry(ticket.device_category.as_str()).or_default() += 1;
    }
    let by_category = categories
        .into_iter()
        .map(|(device_category, total_tickets)| CategoryCount {
            device_category: device_category.to_string(),
            total_tickets,
        })
        .collect();

    let technician_workload = technicians
        .iter()
        .map(|tech| {
            let assigned = tickets
                .iter()
                .filter(|t| t.technician_id == Some(tech.id));
            let (mut active, mut finished) = (0, 0);
            for ticket in assigned {
                if is_active(ticket.status) {
                    active += 1;
                } else {
                    finished += 1;
                }
            }
            TechnicianWorkload {
                technician_id: tech.id,
                display_name: tech.display_name.clone(),
                active_tickets: active,
                finished_tickets: finished,
            }
        })
        .collect();

    Statistics {
        total_tickets,
        completed_tickets,
        technician_count: technicians.len() as u64,
        average_completion_days,
        by_category,
        technician_workload,
    }
}
