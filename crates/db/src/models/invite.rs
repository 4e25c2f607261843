//! Invite model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use bugtrail_core::types::{DbId, Timestamp};

/// An invite row from the `invites` table.
///
/// `company_token` is the external-facing redemption key. `is_valid` is a
/// mutable flag: cleared on redemption or cancellation, the row itself is
/// never deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invite {
    pub id: DbId,
    pub company_token: Uuid,
    pub company_id: DbId,
    pub project_id: Option<DbId>,
    pub invitor_id: DbId,
    pub invitee_id: Option<DbId>,
    pub invitee_email: String,
    pub invitee_first_name: String,
    pub invitee_last_name: String,
    pub message: Option<String>,
    pub is_valid: bool,
    pub invite_date: Timestamp,
    pub join_date: Option<Timestamp>,
}

/// DTO for issuing a new invite. The token and `is_valid` flag are set by
/// the repository, not the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvite {
    pub company_id: DbId,
    pub project_id: Option<DbId>,
    pub invitor_id: DbId,
    pub invitee_email: String,
    pub invitee_first_name: String,
    pub invitee_last_name: String,
    pub message: Option<String>,
}

/// An invite joined with its related display names (company, project,
/// invitor), as returned by the detail lookups.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InviteDetail {
    pub id: DbId,
    pub company_token: Uuid,
    pub company_id: DbId,
    pub company_name: String,
    pub project_id: Option<DbId>,
    pub project_name: Option<String>,
    pub invitor_id: DbId,
    pub invitor_name: String,
    pub invitee_id: Option<DbId>,
    pub invitee_email: String,
    pub invitee_first_name: String,
    pub invitee_last_name: String,
    pub message: Option<String>,
    pub is_valid: bool,
    pub invite_date: Timestamp,
    pub join_date: Option<Timestamp>,
}
