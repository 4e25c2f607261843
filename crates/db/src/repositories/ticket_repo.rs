//! Repository for the `tickets` table.
//!
//! Company scoping goes through the owning project: a ticket is visible to a
//! company only if its project belongs to that company.

use sqlx::PgPool;

use bugtrail_core::types::DbId;

use crate::models::ticket::{CreateTicket, Ticket, UpdateTicket};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, description, ticket_type_id, ticket_status_id, \
                       ticket_priority_id, developer_user_id, submitter_user_id, archived, \
                       archived_by_project, created_at, updated_at";

/// `COLUMNS` qualified with the `t.` alias for joined queries.
fn qualified_columns() -> String {
    format!("t.{}", COLUMNS.replace(", ", ", t."))
}

/// Provides CRUD operations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a new ticket, returning the created row.
    ///
    /// New tickets start in the first status ("New") with no developer.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (project_id, title, description, ticket_type_id,
                                  ticket_status_id, ticket_priority_id, submitter_user_id)
             VALUES ($1, $2, $3, $4,
                     (SELECT id FROM ticket_statuses WHERE name = 'New'), $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.ticket_type_id)
            .bind(input.ticket_priority_id)
            .bind(input.submitter_user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a ticket by ID within a company.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        company_id: DbId,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tickets t
             JOIN projects p ON p.id = t.project_id
             WHERE t.id = $1 AND p.company_id = $2",
            qualified_columns()
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List all non-archived tickets of a company.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tickets t
             JOIN projects p ON p.id = t.project_id
             WHERE p.company_id = $1 AND t.archived = false
             ORDER BY t.created_at DESC",
            qualified_columns()
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// List all archived tickets of a company.
    pub async fn list_archived(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tickets t
             JOIN projects p ON p.id = t.project_id
             WHERE p.company_id = $1 AND t.archived = true
             ORDER BY t.created_at DESC",
            qualified_columns()
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// List all non-archived tickets of a project.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        company_id: DbId,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tickets t
             JOIN projects p ON p.id = t.project_id
             WHERE t.project_id = $1 AND p.company_id = $2 AND t.archived = false
             ORDER BY t.created_at DESC",
            qualified_columns()
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(project_id)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// List non-archived tickets with no assigned developer.
    pub async fn list_unassigned(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tickets t
             JOIN projects p ON p.id = t.project_id
             WHERE p.company_id = $1 AND t.archived = false
               AND t.developer_user_id IS NULL
             ORDER BY t.created_at DESC",
            qualified_columns()
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// List non-archived tickets a user submitted or is developing.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets
             WHERE (developer_user_id = $1 OR submitter_user_id = $1)
               AND archived = false
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a ticket's editable fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the ticket does not exist in this company.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        company_id: DbId,
        input: &UpdateTicket,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets t SET
                title = COALESCE($3, t.title),
                description = COALESCE($4, t.description),
                ticket_type_id = COALESCE($5, t.ticket_type_id),
                ticket_status_id = COALESCE($6, t.ticket_status_id),
                ticket_priority_id = COALESCE($7, t.ticket_priority_id),
                updated_at = NOW()
             FROM projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.company_id = $2
             RETURNING {}",
            qualified_columns()
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(company_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.ticket_type_id)
            .bind(input.ticket_status_id)
            .bind(input.ticket_priority_id)
            .fetch_optional(pool)
            .await
    }

    /// Archive a ticket. Returns the updated row, or `None` when absent or
    /// already archived.
    pub async fn archive(
        pool: &PgPool,
        id: DbId,
        company_id: DbId,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets t SET archived = true, updated_at = NOW()
             FROM projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.company_id = $2
               AND t.archived = false
             RETURNING {}",
            qualified_columns()
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// Restore an archived ticket. Returns the updated row, or `None` when
    /// absent or not archived.
    pub async fn restore(
        pool: &PgPool,
        id: DbId,
        company_id: DbId,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets t SET archived = false, archived_by_project = false,
                                  updated_at = NOW()
             FROM projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.company_id = $2
               AND t.archived = true
             RETURNING {}",
            qualified_columns()
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// Assign (or clear, with `None`) the ticket's developer.
    ///
    /// Returns the updated row, or `None` when the ticket is outside the
    /// company.
    pub async fn assign_developer(
        pool: &PgPool,
        id: DbId,
        company_id: DbId,
        developer_user_id: Option<DbId>,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets t SET developer_user_id = $3, updated_at = NOW()
             FROM projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.company_id = $2
             RETURNING {}",
            qualified_columns()
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(company_id)
            .bind(developer_user_id)
            .fetch_optional(pool)
            .await
    }
}
