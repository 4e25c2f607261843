//! Project model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bugtrail_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub description: String,
    pub priority_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub company_id: DbId,
    pub name: String,
    pub description: String,
    pub priority_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

/// DTO for updating a project. Only non-`None` fields are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority_id: Option<DbId>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}
