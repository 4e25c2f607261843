//! Handlers for the `/company` resource (the caller's own tenant).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use bugtrail_core::error::CoreError;
use bugtrail_core::types::DbId;
use bugtrail_db::models::company::Company;
use bugtrail_db::models::user::MemberRow;
use bugtrail_db::repositories::{CompanyRepo, RoleRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for `PUT /company/members/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: String,
}

/// GET /api/v1/company
pub async fn get_own(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Company>> {
    let company = CompanyRepo::find_by_id(&state.pool, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: user.company_id,
        }))?;
    Ok(Json(company))
}

/// GET /api/v1/company/members
pub async fn members(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<MemberRow>>> {
    let members = CompanyRepo::members(&state.pool, user.company_id).await?;
    Ok(Json(members))
}

/// GET /api/v1/company/members/role/{role}
pub async fn members_by_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(role): Path<String>,
) -> AppResult<Json<Vec<MemberRow>>> {
    let members = UserRepo::list_by_role(&state.pool, user.company_id, &role).await?;
    Ok(Json(members))
}

/// PUT /api/v1/company/members/{id}/role
///
/// Change a member's role. Admins only; an admin cannot demote themselves
/// (the last-admin guard at its simplest).
pub async fn update_member_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMemberRoleRequest>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot change your own role".into(),
        )));
    }

    let role = RoleRepo::find_by_name(&state.pool, &input.role)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown role: {}",
                input.role
            )))
        })?;

    let updated = UserRepo::update_role(&state.pool, id, admin.company_id, role.id).await?;
    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}
