//! Repository for the `projects` and `project_members` tables.
//!
//! All single-project operations are scoped by company id so one tenant can
//! never reach another tenant's rows.

use sqlx::PgPool;

use bugtrail_core::roles::ROLE_PROJECT_MANAGER;
use bugtrail_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::user::MemberRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, name, description, priority_id, start_date, end_date, \
                       archived, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (company_id, name, description, priority_id, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.company_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.priority_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID within a company.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        company_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND company_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List all non-archived projects of a company.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE company_id = $1 AND archived = false
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// List all archived projects of a company.
    pub async fn list_archived(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE company_id = $1 AND archived = true
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// List non-archived projects of a company filtered by priority name.
    pub async fn list_by_priority(
        pool: &PgPool,
        company_id: DbId,
        priority_name: &str,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT p.{} FROM projects p
             JOIN project_priorities pp ON pp.id = p.priority_id
             WHERE p.company_id = $1 AND p.archived = false AND pp.name = $2
             ORDER BY p.created_at DESC",
            COLUMNS.replace(", ", ", p.")
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .bind(priority_name)
            .fetch_all(pool)
            .await
    }

    /// List non-archived projects a user is a member of.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT p.{} FROM projects p
             JOIN project_members pm ON pm.project_id = p.id
             WHERE pm.user_id = $1 AND p.archived = false
             ORDER BY p.created_at DESC",
            COLUMNS.replace(", ", ", p.")
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List non-archived projects that currently have no project manager.
    pub async fn list_unassigned(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p
             WHERE p.company_id = $1 AND p.archived = false
               AND NOT EXISTS (
                   SELECT 1 FROM project_members pm
                   JOIN users u ON u.id = pm.user_id
                   JOIN roles r ON r.id = u.role_id
                   WHERE pm.project_id = p.id AND r.name = $2
               )
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .bind(ROLE_PROJECT_MANAGER)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the project does not exist in this company.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        company_id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                priority_id = COALESCE($5, priority_id),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                updated_at = NOW()
             WHERE id = $1 AND company_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.priority_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Archive a project and cascade onto its open tickets.
    ///
    /// Tickets archived this way are marked `archived_by_project` so a later
    /// restore reopens only them, not tickets archived individually.
    /// Both writes happen in one transaction. Returns `true` if the project
    /// was archived.
    pub async fn archive(pool: &PgPool, id: DbId, company_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE projects SET archived = true, updated_at = NOW()
             WHERE id = $1 AND company_id = $2 AND archived = false",
        )
        .bind(id)
        .bind(company_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE tickets SET archived = true, archived_by_project = true
             WHERE project_id = $1 AND archived = false",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Restore an archived project and the tickets it archived.
    ///
    /// Returns `true` if the project was restored.
    pub async fn restore(pool: &PgPool, id: DbId, company_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE projects SET archived = false, updated_at = NOW()
             WHERE id = $1 AND company_id = $2 AND archived = true",
        )
        .bind(id)
        .bind(company_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE tickets SET archived = false, archived_by_project = false
             WHERE project_id = $1 AND archived_by_project = true",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// List the members of a project with their role names.
    pub async fn members(pool: &PgPool, project_id: DbId) -> Result<Vec<MemberRow>, sqlx::Error> {
        sqlx::query_as::<_, MemberRow>(
            "SELECT u.id, u.email, u.first_name, u.last_name, r.name AS role
             FROM project_members pm
             JOIN users u ON u.id = pm.user_id
             JOIN roles r ON r.id = u.role_id
             WHERE pm.project_id = $1
             ORDER BY u.last_name, u.first_name",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// List the members of a project holding the given role.
    pub async fn members_by_role(
        pool: &PgPool,
        project_id: DbId,
        role_name: &str,
    ) -> Result<Vec<MemberRow>, sqlx::Error> {
        sqlx::query_as::<_, MemberRow>(
            "SELECT u.id, u.email, u.first_name, u.last_name, r.name AS role
             FROM project_members pm
             JOIN users u ON u.id = pm.user_id
             JOIN roles r ON r.id = u.role_id
             WHERE pm.project_id = $1 AND r.name = $2
             ORDER BY u.last_name, u.first_name",
        )
        .bind(project_id)
        .bind(role_name)
        .fetch_all(pool)
        .await
    }

    /// Add a company member to a project. Returns `true` if a row was
    /// inserted, `false` when the user was already a member or either side
    /// is outside the company.
    pub async fn add_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        company_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO project_members (project_id, user_id)
             SELECT p.id, u.id FROM projects p, users u
             WHERE p.id = $1 AND p.company_id = $3
               AND u.id = $2 AND u.company_id = $3
             ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a member from a project. Returns `true` if a row was deleted.
    pub async fn remove_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Project manager
    // -----------------------------------------------------------------------

    /// Find the current project manager, if any.
    pub async fn manager(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<MemberRow>, sqlx::Error> {
        sqlx::query_as::<_, MemberRow>(
            "SELECT u.id, u.email, u.first_name, u.last_name, r.name AS role
             FROM project_members pm
             JOIN users u ON u.id = pm.user_id
             JOIN roles r ON r.id = u.role_id
             WHERE pm.project_id = $1 AND r.name = $2",
        )
        .bind(project_id)
        .bind(ROLE_PROJECT_MANAGER)
        .fetch_optional(pool)
        .await
    }

    /// Assign a project manager, demoting any existing one first.
    ///
    /// The candidate must hold the `project_manager` role and belong to the
    /// same company as the project. Returns `false` (without side effects)
    /// otherwise -- an expected business outcome, not an error.
    pub async fn assign_manager(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        company_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let eligible = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM users u
                 JOIN roles r ON r.id = u.role_id
                 JOIN projects p ON p.company_id = u.company_id
                 WHERE u.id = $1 AND p.id = $2 AND u.company_id = $3 AND r.name = $4
             )",
        )
        .bind(user_id)
        .bind(project_id)
        .bind(company_id)
        .bind(ROLE_PROJECT_MANAGER)
        .fetch_one(pool)
        .await?;

        if !eligible {
            return Ok(false);
        }

        let mut tx = pool.begin().await?;

        // Remove any existing manager before seating the new one.
        sqlx::query(
            "DELETE FROM project_members pm
             USING users u, roles r
             WHERE pm.project_id = $1 AND u.id = pm.user_id
               AND r.id = u.role_id AND r.name = $2",
        )
        .bind(project_id)
        .bind(ROLE_PROJECT_MANAGER)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO project_members (project_id, user_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Remove the current project manager, if any.
    pub async fn remove_manager(pool: &PgPool, project_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM project_members pm
             USING users u, roles r
             WHERE pm.project_id = $1 AND u.id = pm.user_id
               AND r.id = u.role_id AND r.name = $2",
        )
        .bind(project_id)
        .bind(ROLE_PROJECT_MANAGER)
        .execute(pool)
        .await?;
        Ok(())
    }
}
