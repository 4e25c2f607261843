//! Repository for the append-only `ticket_histories` table.
//!
//! Rows are created exclusively here, in direct response to ticket create/
//! update/comment/attachment events, and are never updated or deleted.

use chrono::Utc;
use sqlx::PgPool;

use bugtrail_core::history::{sub_event_description, HistoryEntry};
use bugtrail_core::types::DbId;

use crate::models::ticket_history::TicketHistory;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, ticket_id, property_name, old_value, new_value, description, user_id, created_at";

/// Provides append and query operations for ticket history.
pub struct TicketHistoryRepo;

impl TicketHistoryRepo {
    /// Persist the history rows for one ticket mutation.
    ///
    /// All rows share a single timestamp (time of this call, UTC) and acting
    /// user, and are written in one transaction so the batch lands atomically.
    /// An empty batch (no tracked field changed) writes nothing.
    pub async fn record_change(
        pool: &PgPool,
        entries: &[HistoryEntry],
        user_id: DbId,
    ) -> Result<Vec<TicketHistory>, sqlx::Error> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let created_at = Utc::now();
        let query = format!(
            "INSERT INTO ticket_histories
                 (ticket_id, property_name, old_value, new_value, description, user_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let row = sqlx::query_as::<_, TicketHistory>(&query)
                .bind(entry.ticket_id)
                .bind(&entry.property_name)
                .bind(&entry.old_value)
                .bind(&entry.new_value)
                .bind(&entry.description)
                .bind(user_id)
                .bind(created_at)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }
        tx.commit().await?;

        Ok(rows)
    }

    /// Record a categorized sub-event ("TicketComment", "TicketAttachment")
    /// against a ticket.
    ///
    /// Silently does nothing when the ticket does not exist -- sub-events are
    /// best-effort audit prose, not an integrity check.
    pub async fn record_sub_event(
        pool: &PgPool,
        ticket_id: DbId,
        category: &str,
        user_id: DbId,
    ) -> Result<Option<TicketHistory>, sqlx::Error> {
        let title = sqlx::query_scalar::<_, String>("SELECT title FROM tickets WHERE id = $1")
            .bind(ticket_id)
            .fetch_optional(pool)
            .await?;

        let Some(title) = title else {
            tracing::debug!(ticket_id, category, "Sub-event for missing ticket ignored");
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO ticket_histories
                 (ticket_id, property_name, old_value, new_value, description, user_id, created_at)
             VALUES ($1, $2, '', '', $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TicketHistory>(&query)
            .bind(ticket_id)
            .bind(category)
            .bind(sub_event_description(category, &title))
            .bind(user_id)
            .bind(Utc::now())
            .fetch_one(pool)
            .await?;

        Ok(Some(row))
    }

    /// List the history of one ticket, oldest first.
    pub async fn list_by_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ticket_histories
             WHERE ticket_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, TicketHistory>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }

    /// List the history of every ticket in a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        company_id: DbId,
    ) -> Result<Vec<TicketHistory>, sqlx::Error> {
        let query = format!(
            "SELECT h.{} FROM ticket_histories h
             JOIN tickets t ON t.id = h.ticket_id
             JOIN projects p ON p.id = t.project_id
             WHERE t.project_id = $1 AND p.company_id = $2
             ORDER BY h.created_at DESC, h.id DESC",
            COLUMNS.replace(", ", ", h.")
        );
        sqlx::query_as::<_, TicketHistory>(&query)
            .bind(project_id)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// List the history of every ticket in a company, newest first.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<TicketHistory>, sqlx::Error> {
        let query = format!(
            "SELECT h.{} FROM ticket_histories h
             JOIN tickets t ON t.id = h.ticket_id
             JOIN projects p ON p.id = t.project_id
             WHERE p.company_id = $1
             ORDER BY h.created_at DESC, h.id DESC",
            COLUMNS.replace(", ", ", h.")
        );
        sqlx::query_as::<_, TicketHistory>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }
}
