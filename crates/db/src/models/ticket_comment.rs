//! Ticket comment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bugtrail_core::types::{DbId, Timestamp};

/// A comment row from the `ticket_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketComment {
    pub id: DbId,
    pub ticket_id: DbId,
    pub user_id: DbId,
    pub comment: String,
    pub created_at: Timestamp,
}

/// DTO for adding a comment to a ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicketComment {
    pub ticket_id: DbId,
    pub user_id: DbId,
    pub comment: String,
}

/// A comment joined with its author's display name, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketCommentRow {
    pub id: DbId,
    pub ticket_id: DbId,
    pub user_id: DbId,
    pub author: String,
    pub comment: String,
    pub created_at: Timestamp,
}
