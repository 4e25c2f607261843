//! Repository for the seeded lookup tables and for assembling the
//! id -> display-name maps the audit diff consumes.

use std::collections::HashMap;

use sqlx::PgPool;

use bugtrail_core::history::NameLookups;
use bugtrail_core::types::DbId;

use crate::models::lookup::LookupRow;

/// Provides read operations for lookup tables.
pub struct LookupRepo;

impl LookupRepo {
    /// List all ticket types.
    pub async fn ticket_types(pool: &PgPool) -> Result<Vec<LookupRow>, sqlx::Error> {
        sqlx::query_as::<_, LookupRow>("SELECT id, name FROM ticket_types ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// List all ticket statuses.
    pub async fn ticket_statuses(pool: &PgPool) -> Result<Vec<LookupRow>, sqlx::Error> {
        sqlx::query_as::<_, LookupRow>("SELECT id, name FROM ticket_statuses ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// List all ticket priorities.
    pub async fn ticket_priorities(pool: &PgPool) -> Result<Vec<LookupRow>, sqlx::Error> {
        sqlx::query_as::<_, LookupRow>("SELECT id, name FROM ticket_priorities ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// List all project priorities.
    pub async fn project_priorities(pool: &PgPool) -> Result<Vec<LookupRow>, sqlx::Error> {
        sqlx::query_as::<_, LookupRow>("SELECT id, name FROM project_priorities ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Assemble the fully-resolved name maps for audit diffing.
    ///
    /// Developer names cover every user in the company, so a snapshot pair
    /// never needs related rows loaded; a miss falls back to "Unknown"
    /// inside the diff itself.
    pub async fn name_lookups(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<NameLookups, sqlx::Error> {
        let ticket_types = Self::ticket_types(pool).await?;
        let ticket_statuses = Self::ticket_statuses(pool).await?;
        let ticket_priorities = Self::ticket_priorities(pool).await?;

        let developers = sqlx::query_as::<_, (DbId, String)>(
            "SELECT id, first_name || ' ' || last_name FROM users WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(NameLookups {
            ticket_types: to_map(ticket_types),
            ticket_statuses: to_map(ticket_statuses),
            ticket_priorities: to_map(ticket_priorities),
            developers: developers.into_iter().collect(),
        })
    }
}

fn to_map(rows: Vec<LookupRow>) -> HashMap<DbId, String> {
    rows.into_iter().map(|r| (r.id, r.name)).collect()
}
