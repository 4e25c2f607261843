//! Ticket attachment model and DTOs.
//!
//! File bytes live in the row (`BYTEA`); listings use [`TicketAttachmentMeta`]
//! so the payload is only fetched on download.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bugtrail_core::types::{DbId, Timestamp};

/// A full attachment row from the `ticket_attachments` table.
#[derive(Debug, Clone, FromRow)]
pub struct TicketAttachment {
    pub id: DbId,
    pub ticket_id: DbId,
    pub user_id: DbId,
    pub description: Option<String>,
    pub file_name: String,
    pub file_data: Vec<u8>,
    pub content_type: String,
    pub created_at: Timestamp,
}

/// Attachment metadata without the file payload.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketAttachmentMeta {
    pub id: DbId,
    pub ticket_id: DbId,
    pub user_id: DbId,
    pub description: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub created_at: Timestamp,
}

/// DTO for uploading an attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicketAttachment {
    pub ticket_id: DbId,
    pub user_id: DbId,
    pub description: Option<String>,
    pub file_name: String,
    pub file_data: Vec<u8>,
    pub content_type: String,
}
