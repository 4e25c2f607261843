//! Repository for the `ticket_comments` table.

use sqlx::PgPool;

use bugtrail_core::types::DbId;

use crate::models::ticket_comment::{CreateTicketComment, TicketComment, TicketCommentRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, ticket_id, user_id, comment, created_at";

/// Provides CRUD operations for ticket comments.
pub struct TicketCommentRepo;

impl TicketCommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTicketComment,
    ) -> Result<TicketComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_comments (ticket_id, user_id, comment)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TicketComment>(&query)
            .bind(input.ticket_id)
            .bind(input.user_id)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// List the comments of a ticket with author names, oldest first.
    pub async fn list_by_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketCommentRow>, sqlx::Error> {
        sqlx::query_as::<_, TicketCommentRow>(
            "SELECT c.id, c.ticket_id, c.user_id,
                    u.first_name || ' ' || u.last_name AS author,
                    c.comment, c.created_at
             FROM ticket_comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.ticket_id = $1
             ORDER BY c.created_at, c.id",
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await
    }
}
