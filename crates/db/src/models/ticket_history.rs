//! Ticket history entity model.
//!
//! History rows are append-only: created exclusively by
//! `TicketHistoryRepo::record_change` / `record_sub_event` and never updated
//! or deleted by the application (no `updated_at` column).

use serde::Serialize;
use sqlx::FromRow;

use bugtrail_core::types::{DbId, Timestamp};

/// A single ticket history row. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketHistory {
    pub id: DbId,
    pub ticket_id: DbId,
    /// Name of the tracked field that changed; empty for the creation row
    /// and for comment/attachment sub-events.
    pub property_name: String,
    pub old_value: String,
    pub new_value: String,
    pub description: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
}
