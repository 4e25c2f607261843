//! Repository for the `ticket_attachments` table.

use sqlx::PgPool;

use bugtrail_core::types::DbId;

use crate::models::ticket_attachment::{
    CreateTicketAttachment, TicketAttachment, TicketAttachmentMeta,
};

/// Column list without the file payload, for listings.
const META_COLUMNS: &str =
    "id, ticket_id, user_id, description, file_name, content_type, created_at";

/// Provides CRUD operations for ticket attachments.
pub struct TicketAttachmentRepo;

impl TicketAttachmentRepo {
    /// Insert a new attachment, returning its metadata.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTicketAttachment,
    ) -> Result<TicketAttachmentMeta, sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_attachments
                 (ticket_id, user_id, description, file_name, file_data, content_type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {META_COLUMNS}"
        );
        sqlx::query_as::<_, TicketAttachmentMeta>(&query)
            .bind(input.ticket_id)
            .bind(input.user_id)
            .bind(&input.description)
            .bind(&input.file_name)
            .bind(&input.file_data)
            .bind(&input.content_type)
            .fetch_one(pool)
            .await
    }

    /// Fetch a full attachment (including file bytes) for download.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TicketAttachment>, sqlx::Error> {
        sqlx::query_as::<_, TicketAttachment>(
            "SELECT id, ticket_id, user_id, description, file_name, file_data,
                    content_type, created_at
             FROM ticket_attachments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List the attachments of a ticket (metadata only), oldest first.
    pub async fn list_by_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketAttachmentMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} FROM ticket_attachments
             WHERE ticket_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, TicketAttachmentMeta>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }
}
