//! Handlers for the `/tickets` resource.
//!
//! Every mutation records its audit trail: field changes are diffed against
//! the pre-change snapshot and persisted as one history batch; comments and
//! attachments land as sub-events.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use bugtrail_core::error::CoreError;
use bugtrail_core::history::diff_tickets;
use bugtrail_core::types::DbId;
use bugtrail_db::models::ticket::{CreateTicket, Ticket, UpdateTicket};
use bugtrail_db::models::ticket_attachment::{CreateTicketAttachment, TicketAttachmentMeta};
use bugtrail_db::models::ticket_comment::{CreateTicketComment, TicketComment, TicketCommentRow};
use bugtrail_db::models::ticket_history::TicketHistory;
use bugtrail_db::repositories::{
    LookupRepo, ProjectRepo, TicketAttachmentRepo, TicketCommentRepo, TicketHistoryRepo,
    TicketRepo, UserRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::state::AppState;

/// History category for comment sub-events.
const CATEGORY_COMMENT: &str = "TicketComment";
/// History category for attachment sub-events.
const CATEGORY_ATTACHMENT: &str = "TicketAttachment";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /tickets`. The submitter is the caller.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub ticket_type_id: DbId,
    pub ticket_priority_id: DbId,
}

/// Request body for `PUT /tickets/{id}/developer`. `user_id: null` clears
/// the assignment.
#[derive(Debug, Deserialize)]
pub struct AssignDeveloperRequest {
    pub user_id: Option<DbId>,
}

/// Request body for `POST /tickets/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub comment: String,
}

// ---------------------------------------------------------------------------
// Audit helper
// ---------------------------------------------------------------------------

/// Diff two ticket states and persist the resulting history batch.
async fn record_history(
    state: &AppState,
    company_id: DbId,
    user_id: DbId,
    old: Option<&Ticket>,
    new: &Ticket,
) -> AppResult<()> {
    let lookups = LookupRepo::name_lookups(&state.pool, company_id).await?;
    let old_snapshot = old.map(Ticket::snapshot);
    let entries = diff_tickets(old_snapshot.as_ref(), &new.snapshot(), &lookups);
    TicketHistoryRepo::record_change(&state.pool, &entries, user_id).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/tickets
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateTicketRequest>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    // The target project must belong to the caller's company.
    ProjectRepo::find_by_id(&state.pool, input.project_id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }))?;

    let ticket = TicketRepo::create(
        &state.pool,
        &CreateTicket {
            project_id: input.project_id,
            title: input.title,
            description: input.description,
            ticket_type_id: input.ticket_type_id,
            ticket_priority_id: input.ticket_priority_id,
            submitter_user_id: user.user_id,
        },
    )
    .await?;

    record_history(&state, user.company_id, user.user_id, None, &ticket).await?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/v1/tickets
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = TicketRepo::list_by_company(&state.pool, user.company_id).await?;
    Ok(Json(tickets))
}

/// GET /api/v1/tickets/archived
pub async fn list_archived(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = TicketRepo::list_archived(&state.pool, user.company_id).await?;
    Ok(Json(tickets))
}

/// GET /api/v1/tickets/unassigned
pub async fn list_unassigned(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = TicketRepo::list_unassigned(&state.pool, user.company_id).await?;
    Ok(Json(tickets))
}

/// GET /api/v1/tickets/mine
///
/// Tickets the caller submitted or is developing.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = TicketRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(tickets))
}

/// GET /api/v1/projects/{id}/tickets
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Ticket>>> {
    ProjectRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    let tickets = TicketRepo::list_by_project(&state.pool, id, user.company_id).await?;
    Ok(Json(tickets))
}

/// GET /api/v1/tickets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Ticket>> {
    let ticket = TicketRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;
    Ok(Json(ticket))
}

/// PUT /api/v1/tickets/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicket>,
) -> AppResult<Json<Ticket>> {
    let old = TicketRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    let updated = TicketRepo::update(&state.pool, id, user.company_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    record_history(&state, user.company_id, user.user_id, Some(&old), &updated).await?;

    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// Archive / restore / assignment
// ---------------------------------------------------------------------------

/// POST /api/v1/tickets/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Ticket>> {
    let old = TicketRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    let archived = TicketRepo::archive(&state.pool, id, user.company_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Ticket is already archived".into())))?;

    record_history(&state, user.company_id, user.user_id, Some(&old), &archived).await?;

    Ok(Json(archived))
}

/// POST /api/v1/tickets/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Ticket>> {
    let old = TicketRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    let restored = TicketRepo::restore(&state.pool, id, user.company_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Ticket is not archived".into())))?;

    record_history(&state, user.company_id, user.user_id, Some(&old), &restored).await?;

    Ok(Json(restored))
}

/// PUT /api/v1/tickets/{id}/developer
pub async fn assign_developer(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<AssignDeveloperRequest>,
) -> AppResult<Json<Ticket>> {
    // An assigned developer must exist within this company.
    if let Some(developer_id) = input.user_id {
        UserRepo::find_in_company(&state.pool, developer_id, user.company_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: developer_id,
            }))?;
    }

    let old = TicketRepo::find_by_id(&state.pool, id, user.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    let updated = TicketRepo::assign_developer(&state.pool, id, user.company_id, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    record_history(&state, user.company_id, user.user_id, Some(&old), &updated).await?;

    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// GET /api/v1/tickets/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<TicketCommentRow>>> {
    ensure_ticket(&state, id, user.company_id).await?;
    let comments = TicketCommentRepo::list_by_ticket(&state.pool, id).await?;
    Ok(Json(comments))
}

/// POST /api/v1/tickets/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<TicketComment>)> {
    if input.comment.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Comment must not be empty".into(),
        )));
    }

    ensure_ticket(&state, id, user.company_id).await?;

    let comment = TicketCommentRepo::create(
        &state.pool,
        &CreateTicketComment {
            ticket_id: id,
            user_id: user.user_id,
            comment: input.comment,
        },
    )
    .await?;

    TicketHistoryRepo::record_sub_event(&state.pool, id, CATEGORY_COMMENT, user.user_id).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// GET /api/v1/tickets/{id}/attachments
pub async fn list_attachments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<TicketAttachmentMeta>>> {
    ensure_ticket(&state, id, user.company_id).await?;
    let attachments = TicketAttachmentRepo::list_by_ticket(&state.pool, id).await?;
    Ok(Json(attachments))
}

/// POST /api/v1/tickets/{id}/attachments
///
/// Accepts a multipart form with a required `file` field and an optional
/// `description` field.
pub async fn upload_attachment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<TicketAttachmentMeta>)> {
    ensure_ticket(&state, id, user.company_id).await?;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("attachment.bin").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, content_type, data.to_vec()));
            }
            "description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                description = Some(text);
            }
            _ => {} // ignore unknown fields
        }
    }

    let (file_name, content_type, file_data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    if file_data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let meta = TicketAttachmentRepo::create(
        &state.pool,
        &CreateTicketAttachment {
            ticket_id: id,
            user_id: user.user_id,
            description,
            file_name,
            file_data,
            content_type,
        },
    )
    .await?;

    TicketHistoryRepo::record_sub_event(&state.pool, id, CATEGORY_ATTACHMENT, user.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(meta)))
}

/// GET /api/v1/tickets/{id}/attachments/{attachment_id}
///
/// Download the attachment payload with its stored content type.
pub async fn download_attachment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, attachment_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_ticket(&state, id, user.company_id).await?;

    let attachment = TicketAttachmentRepo::find_by_id(&state.pool, attachment_id)
        .await?
        .filter(|a| a.ticket_id == id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TicketAttachment",
            id: attachment_id,
        }))?;

    let headers = [
        (header::CONTENT_TYPE, attachment.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", attachment.file_name),
        ),
    ];

    Ok((headers, attachment.file_data))
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// GET /api/v1/tickets/{id}/history
pub async fn list_history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<TicketHistory>>> {
    ensure_ticket(&state, id, user.company_id).await?;
    let history = TicketHistoryRepo::list_by_ticket(&state.pool, id).await?;
    Ok(Json(history))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// 404 unless the ticket exists inside the caller's company.
async fn ensure_ticket(state: &AppState, id: DbId, company_id: DbId) -> AppResult<Ticket> {
    TicketRepo::find_by_id(&state.pool, id, company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))
}
