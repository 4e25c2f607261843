//! Route definitions for the `/tickets` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET  /                              -> list
/// POST /                              -> create
/// GET  /archived                      -> list_archived
/// GET  /unassigned                    -> list_unassigned (manager)
/// GET  /mine                          -> list_mine
/// GET  /{id}                          -> get_by_id
/// PUT  /{id}                          -> update
/// POST /{id}/archive                  -> archive
/// POST /{id}/restore                  -> restore
/// PUT  /{id}/developer                -> assign_developer (manager)
/// GET  /{id}/comments                 -> list_comments
/// POST /{id}/comments                 -> create_comment
/// GET  /{id}/attachments              -> list_attachments
/// POST /{id}/attachments              -> upload_attachment (multipart)
/// GET  /{id}/attachments/{aid}        -> download_attachment
/// GET  /{id}/history                  -> list_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list).post(tickets::create))
        .route("/archived", get(tickets::list_archived))
        .route("/unassigned", get(tickets::list_unassigned))
        .route("/mine", get(tickets::list_mine))
        .route("/{id}", get(tickets::get_by_id).put(tickets::update))
        .route("/{id}/archive", post(tickets::archive))
        .route("/{id}/restore", post(tickets::restore))
        .route("/{id}/developer", put(tickets::assign_developer))
        .route(
            "/{id}/comments",
            get(tickets::list_comments).post(tickets::create_comment),
        )
        .route(
            "/{id}/attachments",
            get(tickets::list_attachments).post(tickets::upload_attachment),
        )
        .route(
            "/{id}/attachments/{attachment_id}",
            get(tickets::download_attachment),
        )
        .route("/{id}/history", get(tickets::list_history))
}
