//! Handlers for the `/auth` resource (login, refresh, logout, and
//! invite-based registration).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bugtrail_core::error::CoreError;
use bugtrail_core::invites::token_is_valid;
use bugtrail_core::roles::{ROLE_ADMIN, ROLE_SUBMITTER};
use bugtrail_core::types::DbId;
use bugtrail_db::models::company::CreateCompany;
use bugtrail_db::models::user::CreateUser;
use bugtrail_db::repositories::{
    CompanyRepo, InviteRepo, ProjectRepo, RoleRepo, SessionRepo, UserRepo,
};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/register`. Registration is invite-only; the
/// token arrives via the invite email link.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub token: Uuid,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/register-company`. Bootstraps a new tenant:
/// the company plus its first admin account.
#[derive(Debug, Deserialize)]
pub struct RegisterCompanyRequest {
    pub company_name: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Successful authentication response returned by login, refresh, and register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub company_id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let response = create_auth_response(&state, &user, &role_name).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // Token rotation: the old session dies with this exchange.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let response = create_auth_response(&state, &user, &role_name).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/register
///
/// Complete an invite: create the account, consume the token, and log the new
/// user in. The account joins the inviting company as a submitter, and the
/// invite's project (when one was named) as a member.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let invite = InviteRepo::find_by_token(&state.pool, input.token)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid invite token".into())))?;

    if !token_is_valid(invite.invite_date, invite.is_valid, Utc::now()) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invite token has expired or was revoked".into(),
        )));
    }

    // The token is bound to the invited address.
    if !invite.invitee_email.eq_ignore_ascii_case(&input.email) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invite token does not match this email".into(),
        )));
    }

    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let submitter_role = RoleRepo::find_by_name(&state.pool, ROLE_SUBMITTER)
        .await?
        .ok_or_else(|| AppError::InternalError("Submitter role missing".into()))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            company_id: invite.company_id,
            role_id: submitter_role.id,
            email: invite.invitee_email.clone(),
            password_hash,
            first_name: invite.invitee_first_name.clone(),
            last_name: invite.invitee_last_name.clone(),
        },
    )
    .await?;

    let redeemed = InviteRepo::accept(&state.pool, input.token, user.id, invite.company_id).await?;
    if !redeemed {
        // Another registration raced us to the token.
        return Err(AppError::Core(CoreError::Conflict(
            "Invite was already redeemed".into(),
        )));
    }

    if let Some(project_id) = invite.project_id {
        ProjectRepo::add_member(&state.pool, project_id, user.id, invite.company_id).await?;
    }

    tracing::info!(user_id = user.id, company_id = invite.company_id, "Invite redeemed");

    let response = create_auth_response(&state, &user, ROLE_SUBMITTER).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/register-company
///
/// Create a new company together with its first admin account and log that
/// admin in. All further accounts join through invites.
pub async fn register_company(
    State(state): State<AppState>,
    Json(input): Json<RegisterCompanyRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    if input.company_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Company name must not be empty".into(),
        )));
    }

    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let admin_role = RoleRepo::find_by_name(&state.pool, ROLE_ADMIN)
        .await?
        .ok_or_else(|| AppError::InternalError("Admin role missing".into()))?;

    let company = CompanyRepo::create(
        &state.pool,
        &CreateCompany {
            name: input.company_name.trim().to_string(),
            description: None,
        },
    )
    .await?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            company_id: company.id,
            role_id: admin_role.id,
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
        },
    )
    .await?;

    tracing::info!(company_id = company.id, user_id = user.id, "Company registered");

    let response = create_auth_response(&state, &user, ROLE_ADMIN).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(
    state: &AppState,
    user: &bugtrail_db::models::user::User,
    role: &str,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, user.company_id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let session_input = bugtrail_db::models::session::CreateSession {
        user_id: user.id,
        refresh_token_hash: refresh_hash,
        expires_at,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: UserInfo {
            id: user.id,
            company_id: user.company_id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: role.to_string(),
        },
    })
}
