//! Repository for the `users` table.

use sqlx::PgPool;

use bugtrail_core::types::DbId;

use crate::models::user::{CreateUser, MemberRow, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, company_id, role_id, email, password_hash, first_name, last_name, created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (company_id, role_id, email, password_hash, first_name, last_name)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.company_id)
            .bind(input.role_id)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (emails are globally unique).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by ID scoped to a company.
    pub async fn find_in_company(
        pool: &PgPool,
        id: DbId,
        company_id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND company_id = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List all users of a company holding the given role.
    pub async fn list_by_role(
        pool: &PgPool,
        company_id: DbId,
        role_name: &str,
    ) -> Result<Vec<MemberRow>, sqlx::Error> {
        sqlx::query_as::<_, MemberRow>(
            "SELECT u.id, u.email, u.first_name, u.last_name, r.name AS role
             FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE u.company_id = $1 AND r.name = $2
             ORDER BY u.last_name, u.first_name",
        )
        .bind(company_id)
        .bind(role_name)
        .fetch_all(pool)
        .await
    }

    /// Change a user's role. Returns `true` if the row was updated.
    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        company_id: DbId,
        role_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET role_id = $3 WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .bind(role_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
