// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only comment log operations.

use rusqlite::params;

use fixtrack_core::{Comment, CommentId, FixtrackError, NewComment, TicketId, UserId};

use crate::database::{map_constraint_err, map_tr_err, Database};

use super::{parse_enum, parse_timestamp};

/// Append a comment to a ticket's log.
pub async fn append_comment(db: &Database, comment: &NewComment) -> Result<Comment, FixtrackError> {
    let comment = comment.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO comments (ticket_id, author_id, kind, message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    comment.ticket_id.0,
                    comment.author_id.0,
                    comment.kind.to_string(),
                    comment.message,
                    comment.created_at.to_rfc3339(),
                ],
            )?;
            let id = CommentId(conn.last_insert_rowid());
            Ok(Comment {
                id,
                ticket_id: comment.ticket_id,
                author_id: comment.author_id,
                kind: comment.kind,
                message: comment.message,
                created_at: comment.created_at,
            })
        })
        .await
        .map_err(map_constraint_err)
}

/// All comments for a ticket in ascending creation order.
pub async fn comments_for_ticket(
    db: &Database,
    id: TicketId,
) -> Result<Vec<Comment>, FixtrackError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT comment_id, ticket_id, author_id, kind, message, created_at
                 FROM comments WHERE ticket_id = ?1
                 ORDER BY created_at ASC, comment_id ASC",
            )?;
            let rows = stmt.query_map(params![id.0], |row| {
                let kind: String = row.get(3)?;
                let created_at: String = row.get(5)?;
                Ok(Comment {
                    id: CommentId(row.get(0)?),
                    ticket_id: TicketId(row.get(1)?),
                    author_id: UserId(row.get(2)?),
                    kind: parse_enum(3, &kind)?,
                    message: row.get(4)?,
                    created_at: parse_timestamp(5, &created_at)?,
                })
            })?;
            let mut comments = Vec::new();
            for row in rows {
                comments.push(row?);
            }
            Ok(comments)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::tempdir;

    use fixtrack_core::{CommentKind, NewTicket, NewUser, Role};

    use crate::queries::{tickets, users};

    use super::*;

    async fn setup() -> (Database, tempfile::TempDir, TicketId, UserId) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let client = users::insert_user(
            &db,
            &NewUser {
                display_name: "Client".to_string(),
                login: "client".to_string(),
                phone: "+1-555-0100".to_string(),
                role: Role::Client,
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap();
        let ticket = tickets::insert_ticket(
            &db,
            &NewTicket {
                device_category: "Laptop".to_string(),
                device_model: "X1".to_string(),
                problem_description: "no display".to_string(),
                client_id: client.id,
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        (db, dir, ticket.id, client.id)
    }

    fn make_comment(ticket_id: TicketId, author_id: UserId, message: &str) -> NewComment {
        NewComment {
            ticket_id,
            author_id,
            kind: CommentKind::User,
            message: message.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn append_and_read_back_in_order() {
        let (db, _dir, ticket_id, author) = setup().await;

        append_comment(&db, &make_comment(ticket_id, author, "first")).await.unwrap();
        append_comment(&db, &make_comment(ticket_id, author, "second")).await.unwrap();
        append_comment(&db, &make_comment(ticket_id, author, "third")).await.unwrap();

        let log = comments_for_ticket(&db, ticket_id).await.unwrap();
        let messages: Vec<&str> = log.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn audit_kind_round_trips() {
        let (db, _dir, ticket_id, author) = setup().await;

        let mut note = make_comment(ticket_id, author, "status changed: New -> InRepair");
        note.kind = CommentKind::Audit;
        append_comment(&db, &note).await.unwrap();

        let log = comments_for_ticket(&db, ticket_id).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, CommentKind::Audit);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_ticket_reference_is_rejected() {
        let (db, _dir, _ticket_id, author) = setup().await;

        let err = append_comment(&db, &make_comment(TicketId(404), author, "ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, FixtrackError::Conflict(_)));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_log_for_fresh_ticket() {
        let (db, _dir, ticket_id, _author) = setup().await;
        let log = comments_for_ticket(&db, ticket_id).await.unwrap();
        assert!(log.is_empty());
        db.close().await.unwrap();
    }
}
