//! Handlers for the `/invites` resource.
//!
//! Admins issue and cancel invites; the validate endpoint is public so the
//! registration page can check a token before showing the form.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bugtrail_core::error::CoreError;
use bugtrail_core::types::DbId;
use bugtrail_db::models::invite::{CreateInvite, Invite, InviteDetail};
use bugtrail_db::repositories::{CompanyRepo, InviteRepo, ProjectRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /invites`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInviteRequest {
    #[validate(email)]
    pub invitee_email: String,
    #[validate(length(min = 1))]
    pub invitee_first_name: String,
    #[validate(length(min = 1))]
    pub invitee_last_name: String,
    pub project_id: Option<DbId>,
    pub message: Option<String>,
}

/// Query string for `GET /invites/validate`.
#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub token: Uuid,
}

/// Response body for `GET /invites/validate`.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/invites
///
/// Issue an invite and, when SMTP is configured, email the registration link.
/// A mail failure does not fail the request; the invite stands and its token
/// can be re-sent out of band.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateInviteRequest>,
) -> AppResult<(StatusCode, Json<Invite>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    // Refuse to invite an address that already has an account.
    if UserRepo::find_by_email(&state.pool, &input.invitee_email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    if let Some(project_id) = input.project_id {
        ProjectRepo::find_by_id(&state.pool, project_id, admin.company_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))?;
    }

    let invite = InviteRepo::create(
        &state.pool,
        &CreateInvite {
            company_id: admin.company_id,
            project_id: input.project_id,
            invitor_id: admin.user_id,
            invitee_email: input.invitee_email,
            invitee_first_name: input.invitee_first_name,
            invitee_last_name: input.invitee_last_name,
            message: input.message,
        },
    )
    .await?;

    if let Some(mailer) = &state.mailer {
        let company = CompanyRepo::find_by_id(&state.pool, admin.company_id).await?;
        let invitor = UserRepo::find_by_id(&state.pool, admin.user_id).await?;
        let company_name = company.map(|c| c.name).unwrap_or_default();
        let invitor_name = invitor.map(|u| u.full_name()).unwrap_or_default();

        if let Err(e) = mailer
            .send_invite(&invite, &company_name, &invitor_name, &state.config.app_base_url)
            .await
        {
            tracing::warn!(invite_id = invite.id, error = %e, "Invite email delivery failed");
        }
    }

    Ok((StatusCode::CREATED, Json(invite)))
}

/// GET /api/v1/invites
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<Vec<InviteDetail>>> {
    let invites = InviteRepo::list_by_company(&state.pool, admin.company_id).await?;
    Ok(Json(invites))
}

/// GET /api/v1/invites/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<InviteDetail>> {
    let invite = InviteRepo::find_by_id(&state.pool, id, admin.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Invite",
            id,
        }))?;
    Ok(Json(invite))
}

/// DELETE /api/v1/invites/{id}
///
/// Cancel an invite. Succeeds whether or not the invite was still valid;
/// the row stays for audit.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    InviteRepo::cancel(&state.pool, id, admin.company_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/invites/validate?token=...
///
/// Public endpoint. Reports whether the token is redeemable right now; it
/// deliberately does not say why an invalid token is invalid.
pub async fn validate(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
) -> AppResult<Json<ValidateResponse>> {
    let valid = InviteRepo::validate_token(&state.pool, query.token).await?;
    Ok(Json(ValidateResponse { valid }))
}
