// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket CRUD operations with optimistic versioning.

use rusqlite::params;

use fixtrack_core::{
    Comment, CommentId, FixtrackError, NewComment, NewTicket, Ticket, TicketFilter, TicketId,
    TicketStatus, UserId,
};

use crate::database::{map_constraint_err, map_tr_err, Database};

use super::{parse_enum, parse_timestamp};

const TICKET_COLUMNS: &str = "ticket_id, device_category, device_model, problem_description, \
                              status, created_at, completed_at, technician_id, client_id, version";

const UPDATE_TICKET_SQL: &str = "UPDATE tickets
     SET device_category = ?1, device_model = ?2, problem_description = ?3,
         status = ?4, completed_at = ?5, technician_id = ?6,
         version = version + 1
     WHERE ticket_id = ?7 AND version = ?8";

/// Outcome of a versioned UPDATE, resolved to an error outside the closure.
enum UpdateOutcome<T> {
    Updated(T),
    Stale,
    Missing,
}

fn resolve_update<T>(outcome: UpdateOutcome<T>, id: TicketId) -> Result<T, FixtrackError> {
    match outcome {
        UpdateOutcome::Updated(value) => Ok(value),
        UpdateOutcome::Stale => Err(FixtrackError::Conflict(format!(
            "ticket {id} was modified concurrently"
        ))),
        UpdateOutcome::Missing => Err(FixtrackError::not_found("ticket", id)),
    }
}

/// Insert a new ticket with `New` status and version 0.
pub async fn insert_ticket(db: &Database, ticket: &NewTicket) -> Result<Ticket, FixtrackError> {
    let ticket = ticket.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tickets (device_category, device_model, problem_description,
                                      status, created_at, client_id, version)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
                params![
                    ticket.device_category,
                    ticket.device_model,
                    ticket.problem_description,
                    TicketStatus::New.to_string(),
                    ticket.created_at.to_rfc3339(),
                    ticket.client_id.0,
                ],
            )?;
            let id = TicketId(conn.last_insert_rowid());
            Ok(Ticket {
                id,
                device_category: ticket.device_category,
                device_model: ticket.device_model,
                problem_description: ticket.problem_description,
                status: TicketStatus::New,
                created_at: ticket.created_at,
                completed_at: None,
                technician_id: None,
                client_id: ticket.client_id,
                version: 0,
            })
        })
        .await
        .map_err(map_constraint_err)
}

/// Get a ticket by id.
pub async fn get_ticket(db: &Database, id: TicketId) -> Result<Option<Ticket>, FixtrackError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TICKET_COLUMNS} FROM tickets WHERE ticket_id = ?1"
            ))?;
            let result = stmt.query_row(params![id.0], row_to_ticket);
            match result {
                Ok(ticket) => Ok(Some(ticket)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List tickets matching the filter, newest first.
///
/// Filter fields are conjunctive; the WHERE clause is assembled from
/// whichever are present.
pub async fn list_tickets(
    db: &Database,
    filter: &TicketFilter,
) -> Result<Vec<Ticket>, FixtrackError> {
    let filter = filter.clone();
    db.connection()
        .call(move |conn| {
            let mut clauses: Vec<&str> = Vec::new();
            let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
            if let Some(id) = filter.id {
                clauses.push("ticket_id = ?");
                values.push(Box::new(id.0));
            }
            if let Some(status) = filter.status {
                clauses.push("status = ?");
                values.push(Box::new(status.to_string()));
            }
            if let Some(client_id) = filter.client_id {
                clauses.push("client_id = ?");
                values.push(Box::new(client_id.0));
            }
            if let Some(technician_id) = filter.technician_id {
                clauses.push("technician_id = ?");
                values.push(Box::new(technician_id.0));
            }

            let mut sql = format!("SELECT {TICKET_COLUMNS} FROM tickets");
            if !clauses.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
            sql.push_str(" ORDER BY created_at DESC, ticket_id DESC");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
                row_to_ticket,
            )?;
            let mut tickets = Vec::new();
            for row in rows {
                tickets.push(row?);
            }
            Ok(tickets)
        })
        .await
        .map_err(map_tr_err)
}

/// Commit a full-row update if `ticket.version` still matches the stored
/// row. Returns the row with its bumped version, `Conflict` if another
/// writer got there first, or `NotFound` if the row is gone.
pub async fn update_ticket(db: &Database, ticket: &Ticket) -> Result<Ticket, FixtrackError> {
    let id = ticket.id;
    let ticket = ticket.clone();
    let outcome = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute(
                UPDATE_TICKET_SQL,
                params![
                    ticket.device_category,
                    ticket.device_model,
                    ticket.problem_description,
                    ticket.status.to_string(),
                    ticket.completed_at.map(|t| t.to_rfc3339()),
                    ticket.technician_id.map(|u| u.0),
                    ticket.id.0,
                    ticket.version,
                ],
            )?;
            if changed == 0 {
                return Ok(versioned_miss(conn, ticket.id)?);
            }
            let mut stored = ticket;
            stored.version += 1;
            Ok(UpdateOutcome::Updated(stored))
        })
        .await
        .map_err(map_constraint_err)?;

    resolve_update(outcome, id)
}

/// Commit a versioned update and its audit note in one transaction.
///
/// A stale or missing row commits nothing; a failed note insert rolls the
/// status change back. The comment log never diverges from the row it
/// describes.
pub async fn update_ticket_with_audit(
    db: &Database,
    ticket: &Ticket,
    note: &NewComment,
) -> Result<(Ticket, Comment), FixtrackError> {
    let id = ticket.id;
    let ticket = ticket.clone();
    let note = note.clone();
    let outcome = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                UPDATE_TICKET_SQL,
                params![
                    ticket.device_category,
                    ticket.device_model,
                    ticket.problem_description,
                    ticket.status.to_string(),
                    ticket.completed_at.map(|t| t.to_rfc3339()),
                    ticket.technician_id.map(|u| u.0),
                    ticket.id.0,
                    ticket.version,
                ],
            )?;
            if changed == 0 {
                // Dropping the transaction rolls it back.
                return Ok(versioned_miss(&tx, ticket.id)?);
            }
            tx.execute(
                "INSERT INTO comments (ticket_id, author_id, kind, message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    note.ticket_id.0,
                    note.author_id.0,
                    note.kind.to_string(),
                    note.message,
                    note.created_at.to_rfc3339(),
                ],
            )?;
            let comment = Comment {
                id: CommentId(tx.last_insert_rowid()),
                ticket_id: note.ticket_id,
                author_id: note.author_id,
                kind: note.kind,
                message: note.message,
                created_at: note.created_at,
            };
            tx.commit()?;
            let mut stored = ticket;
            stored.version += 1;
            Ok(UpdateOutcome::Updated((stored, comment)))
        })
        .await
        .map_err(map_constraint_err)?;

    resolve_update(outcome, id)
}

fn versioned_miss<T>(
    conn: &rusqlite::Connection,
    id: TicketId,
) -> rusqlite::Result<UpdateOutcome<T>> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tickets WHERE ticket_id = ?1)",
        params![id.0],
        |row| row.get(0),
    )?;
    Ok(if exists {
        UpdateOutcome::Stale
    } else {
        UpdateOutcome::Missing
    })
}

fn row_to_ticket(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    let status: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let completed_at: Option<String> = row.get(6)?;
    let technician_id: Option<i64> = row.get(7)?;
    Ok(Ticket {
        id: TicketId(row.get(0)?),
        device_category: row.get(1)?,
        device_model: row.get(2)?,
        problem_description: row.get(3)?,
        status: parse_enum(4, &status)?,
        created_at: parse_timestamp(5, &created_at)?,
        completed_at: completed_at
            .as_deref()
            .map(|s| parse_timestamp(6, s))
            .transpose()?,
        technician_id: technician_id.map(UserId),
        client_id: UserId(row.get(8)?),
        version: row.get(9)?,
    })
}
