//! Handlers for project- and company-wide history feeds.
//!
//! Per-ticket history lives under `/tickets/{id}/history`.

use axum::extract::{Path, State};
use axum::Json;

use bugtrail_core::error::CoreError;
use bugtrail_core::types::DbId;
use bugtrail_db::models::ticket_history::TicketHistory;
use bugtrail_db::repositories::{ProjectRepo, TicketHistoryRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/history
///
/// Company-wide activity feed, newest first.
pub async fn list_company(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<TicketHistory>>> {
    let history = TicketHistoryRepo::list_by_company(&state.pool, user.company_id).await?;
    Ok(Json(history))
}

/// GET /api/v1/projects/{id}/history
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<TicketHistory>>> {
    ProjectRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    let history = TicketHistoryRepo::list_by_project(&state.pool, id, user.company_id).await?;
    Ok(Json(history))
}
