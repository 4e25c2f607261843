//! Role model.

use serde::Serialize;
use sqlx::FromRow;

use bugtrail_core::types::DbId;

/// A role row from the `roles` table. Seeded by migration, never mutated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
}
