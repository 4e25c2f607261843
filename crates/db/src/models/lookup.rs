//! Rows for the seeded lookup tables (ticket types, statuses, priorities,
//! project priorities). All share the same `{id, name}` shape.

use serde::Serialize;
use sqlx::FromRow;

use bugtrail_core::types::DbId;

/// A generic `{id, name}` lookup row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LookupRow {
    pub id: DbId,
    pub name: String,
}
