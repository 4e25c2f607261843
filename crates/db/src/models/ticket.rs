//! Ticket model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bugtrail_core::history::TicketSnapshot;
use bugtrail_core::types::{DbId, Timestamp};

/// A ticket row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub ticket_type_id: DbId,
    pub ticket_status_id: DbId,
    pub ticket_priority_id: DbId,
    pub developer_user_id: Option<DbId>,
    pub submitter_user_id: DbId,
    pub archived: bool,
    pub archived_by_project: bool,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl Ticket {
    /// Capture the tracked fields for audit diffing.
    pub fn snapshot(&self) -> TicketSnapshot {
        TicketSnapshot {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            archived: self.archived,
            ticket_type_id: self.ticket_type_id,
            ticket_status_id: self.ticket_status_id,
            ticket_priority_id: self.ticket_priority_id,
            developer_user_id: self.developer_user_id,
        }
    }
}

/// DTO for creating a new ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub ticket_type_id: DbId,
    pub ticket_priority_id: DbId,
    pub submitter_user_id: DbId,
}

/// DTO for updating a ticket. Only non-`None` fields are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTicket {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ticket_type_id: Option<DbId>,
    pub ticket_status_id: Option<DbId>,
    pub ticket_priority_id: Option<DbId>,
}
