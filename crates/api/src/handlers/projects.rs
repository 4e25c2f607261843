//! Handlers for the `/projects` resource.
//!
//! All queries are scoped to the caller's company; a project outside it is
//! indistinguishable from a missing one (404).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use bugtrail_core::error::CoreError;
use bugtrail_core::types::{DbId, Timestamp};
use bugtrail_db::models::project::{CreateProject, Project, UpdateProject};
use bugtrail_db::models::user::MemberRow;
use bugtrail_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireManager};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects`. The company comes from the caller's
/// token, never from the body.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    pub priority_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

/// Request body for `POST /projects/{id}/members` and manager assignment.
#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    pub user_id: DbId,
}

/// Query string for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    /// Filter by priority name (e.g. `Urgent`).
    pub priority: Option<String>,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if input.end_date < input.start_date {
        return Err(AppError::Core(CoreError::Validation(
            "Project end date must not precede its start date".into(),
        )));
    }

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            company_id: user.company_id,
            name: input.name,
            description: input.description,
            priority_id: input.priority_id,
            start_date: input.start_date,
            end_date: input.end_date,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
///
/// Optionally filtered by priority name via `?priority=Urgent`.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ProjectListQuery>,
) -> AppResult<Json<Vec<Project>>> {
    let projects = match query.priority {
        Some(priority) => {
            ProjectRepo::list_by_priority(&state.pool, user.company_id, &priority).await?
        }
        None => ProjectRepo::list_by_company(&state.pool, user.company_id).await?,
    };
    Ok(Json(projects))
}

/// GET /api/v1/projects/archived
pub async fn list_archived(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list_archived(&state.pool, user.company_id).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/mine
///
/// Projects the caller is a member of.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/unassigned
///
/// Projects without a project manager. Admins use this to find orphans.
pub async fn list_unassigned(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list_unassigned(&state.pool, user.company_id).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::update(&state.pool, id, user.company_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

// ---------------------------------------------------------------------------
// Archive / restore
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/archive
///
/// Archives the project and all of its open tickets.
pub async fn archive(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let archived = ProjectRepo::archive(&state.pool, id, user.company_id).await?;
    if archived {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

/// POST /api/v1/projects/{id}/restore
///
/// Restores the project and reopens the tickets its archive closed.
pub async fn restore(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let restored = ProjectRepo::restore(&state.pool, id, user.company_id).await?;
    if restored {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// Query string for `GET /projects/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct MemberListQuery {
    /// Filter by role name (e.g. `developer`).
    pub role: Option<String>,
}

/// GET /api/v1/projects/{id}/members
///
/// Optionally filtered by role name via `?role=developer`.
pub async fn members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<MemberListQuery>,
) -> AppResult<Json<Vec<MemberRow>>> {
    // Existence check keeps the 404 consistent with the other routes.
    ProjectRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    let members = match query.role {
        Some(role) => ProjectRepo::members_by_role(&state.pool, id, &role).await?,
        None => ProjectRepo::members(&state.pool, id).await?,
    };
    Ok(Json(members))
}

/// POST /api/v1/projects/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<MemberRequest>,
) -> AppResult<StatusCode> {
    let added = ProjectRepo::add_member(&state.pool, id, input.user_id, user.company_id).await?;
    if added {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::Validation(
            "User is already a member or outside this company".into(),
        )))
    }
}

/// DELETE /api/v1/projects/{id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ProjectRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    let removed = ProjectRepo::remove_member(&state.pool, id, user_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Project manager
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/manager
pub async fn manager(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Option<MemberRow>>> {
    ProjectRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    let manager = ProjectRepo::manager(&state.pool, id).await?;
    Ok(Json(manager))
}

/// PUT /api/v1/projects/{id}/manager
///
/// Seats a project manager, demoting any current one. The candidate must
/// hold the project manager role within this company.
pub async fn assign_manager(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<MemberRequest>,
) -> AppResult<StatusCode> {
    let assigned =
        ProjectRepo::assign_manager(&state.pool, id, input.user_id, user.company_id).await?;
    if assigned {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::Validation(
            "User is not an eligible project manager for this project".into(),
        )))
    }
}

/// DELETE /api/v1/projects/{id}/manager
pub async fn remove_manager(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ProjectRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    ProjectRepo::remove_manager(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
