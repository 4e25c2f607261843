//! Company (tenant) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bugtrail_core::types::{DbId, Timestamp};

/// A company row from the `companies` table. Companies are the tenancy root.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new company.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub description: Option<String>,
}
