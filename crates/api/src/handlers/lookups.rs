//! Handlers for the seeded lookup tables the UI needs to render pickers.

use axum::extract::State;
use axum::Json;

use bugtrail_db::models::lookup::LookupRow;
use bugtrail_db::models::role::Role;
use bugtrail_db::repositories::{LookupRepo, RoleRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/lookups/ticket-types
pub async fn ticket_types(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<LookupRow>>> {
    Ok(Json(LookupRepo::ticket_types(&state.pool).await?))
}

/// GET /api/v1/lookups/ticket-statuses
pub async fn ticket_statuses(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<LookupRow>>> {
    Ok(Json(LookupRepo::ticket_statuses(&state.pool).await?))
}

/// GET /api/v1/lookups/ticket-priorities
pub async fn ticket_priorities(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<LookupRow>>> {
    Ok(Json(LookupRepo::ticket_priorities(&state.pool).await?))
}

/// GET /api/v1/lookups/project-priorities
pub async fn project_priorities(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<LookupRow>>> {
    Ok(Json(LookupRepo::project_priorities(&state.pool).await?))
}

/// GET /api/v1/lookups/roles
pub async fn roles(State(state): State<AppState>, _user: AuthUser) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(RoleRepo::list(&state.pool).await?))
}
