//! Repository for the `invites` table.
//!
//! Implements the invite lifecycle: issue, look up, validate, redeem,
//! cancel. Invites are never deleted; redemption and cancellation clear the
//! `is_valid` flag so consumed rows remain as audit artifacts.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use bugtrail_core::invites::{new_invite_token, token_is_valid};
use bugtrail_core::types::DbId;

use crate::models::invite::{CreateInvite, Invite, InviteDetail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_token, company_id, project_id, invitor_id, invitee_id, \
                       invitee_email, invitee_first_name, invitee_last_name, message, \
                       is_valid, invite_date, join_date";

/// Detail column list joining company/project/invitor display names.
const DETAIL_COLUMNS: &str = "\
    i.id, i.company_token, i.company_id, c.name AS company_name, \
    i.project_id, p.name AS project_name, \
    i.invitor_id, u.first_name || ' ' || u.last_name AS invitor_name, \
    i.invitee_id, i.invitee_email, i.invitee_first_name, i.invitee_last_name, \
    i.message, i.is_valid, i.invite_date, i.join_date";

const DETAIL_FROM: &str = "\
    FROM invites i \
    JOIN companies c ON c.id = i.company_id \
    JOIN users u ON u.id = i.invitor_id \
    LEFT JOIN projects p ON p.id = i.project_id";

/// Provides lifecycle operations for company invites.
pub struct InviteRepo;

impl InviteRepo {
    /// Issue a new invite with a freshly generated token and `is_valid = true`.
    ///
    /// Message dispatch (email) is the caller's concern, not this method's.
    pub async fn create(pool: &PgPool, input: &CreateInvite) -> Result<Invite, sqlx::Error> {
        let query = format!(
            "INSERT INTO invites
                 (company_token, company_id, project_id, invitor_id, invitee_email,
                  invitee_first_name, invitee_last_name, message)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invite>(&query)
            .bind(new_invite_token())
            .bind(input.company_id)
            .bind(input.project_id)
            .bind(input.invitor_id)
            .bind(&input.invitee_email)
            .bind(&input.invitee_first_name)
            .bind(&input.invitee_last_name)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// Find an invite by surrogate id within a company, with related names
    /// expanded. Absence is `None`, never an error.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        company_id: DbId,
    ) -> Result<Option<InviteDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
             WHERE i.id = $1 AND i.company_id = $2"
        );
        sqlx::query_as::<_, InviteDetail>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an invite by its token alone. Used by registration, where the
    /// caller has no company context yet.
    pub async fn find_by_token(pool: &PgPool, token: Uuid) -> Result<Option<Invite>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invites WHERE company_token = $1");
        sqlx::query_as::<_, Invite>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Find an invite by exact (token, invitee email, company) match, with
    /// related names expanded.
    pub async fn find_detail(
        pool: &PgPool,
        token: Uuid,
        email: &str,
        company_id: DbId,
    ) -> Result<Option<InviteDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
             WHERE i.company_token = $1 AND i.invitee_email = $2 AND i.company_id = $3"
        );
        sqlx::query_as::<_, InviteDetail>(&query)
            .bind(token)
            .bind(email)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List all invites of a company, newest first.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<InviteDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
             WHERE i.company_id = $1
             ORDER BY i.invite_date DESC"
        );
        sqlx::query_as::<_, InviteDetail>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Check whether a token is redeemable right now.
    ///
    /// True only when the invite exists, was issued at most 7 days ago, and
    /// is still flagged valid. A missing or expired invite yields `false`,
    /// never an error.
    pub async fn validate_token(pool: &PgPool, token: Uuid) -> Result<bool, sqlx::Error> {
        Ok(Self::find_by_token(pool, token)
            .await?
            .map(|i| token_is_valid(i.invite_date, i.is_valid, Utc::now()))
            .unwrap_or(false))
    }

    /// Redeem an invite: clear `is_valid`, record the redeeming user and
    /// join date. Returns whether redemption occurred.
    ///
    /// The `is_valid` guard in the UPDATE makes a second call with the same
    /// token find no matching row and return `false`.
    pub async fn accept(
        pool: &PgPool,
        token: Uuid,
        user_id: DbId,
        company_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE invites
             SET is_valid = false, invitee_id = $2, join_date = NOW()
             WHERE company_token = $1 AND company_id = $3 AND is_valid = true",
        )
        .bind(token)
        .bind(user_id)
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cancel an invite by clearing `is_valid`. A missing invite is a
    /// silent no-op; the operation does not report whether anything changed.
    pub async fn cancel(pool: &PgPool, id: DbId, company_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE invites SET is_valid = false WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
