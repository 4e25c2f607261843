//! Repository for the `companies` table.

use sqlx::PgPool;

use bugtrail_core::types::DbId;

use crate::models::company::{Company, CreateCompany};
use crate::models::user::MemberRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at";

/// Provides CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a company by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all members of a company with their role names.
    pub async fn members(pool: &PgPool, company_id: DbId) -> Result<Vec<MemberRow>, sqlx::Error> {
        sqlx::query_as::<_, MemberRow>(
            "SELECT u.id, u.email, u.first_name, u.last_name, r.name AS role
             FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE u.company_id = $1
             ORDER BY u.last_name, u.first_name",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }
}
