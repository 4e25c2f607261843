//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{history, projects, tickets};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create (manager)
/// GET    /archived                -> list_archived
/// GET    /mine                    -> list_mine
/// GET    /unassigned              -> list_unassigned (admin)
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update (manager)
/// POST   /{id}/archive            -> archive (manager)
/// POST   /{id}/restore            -> restore (manager)
/// GET    /{id}/members            -> members
/// POST   /{id}/members            -> add_member (manager)
/// DELETE /{id}/members/{user_id}  -> remove_member (manager)
/// GET    /{id}/manager            -> manager
/// PUT    /{id}/manager            -> assign_manager (admin)
/// DELETE /{id}/manager            -> remove_manager (admin)
/// GET    /{id}/tickets            -> list_by_project
/// GET    /{id}/history            -> list_by_project (history)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/archived", get(projects::list_archived))
        .route("/mine", get(projects::list_mine))
        .route("/unassigned", get(projects::list_unassigned))
        .route("/{id}", get(projects::get_by_id).put(projects::update))
        .route("/{id}/archive", post(projects::archive))
        .route("/{id}/restore", post(projects::restore))
        .route(
            "/{id}/members",
            get(projects::members).post(projects::add_member),
        )
        .route(
            "/{id}/members/{user_id}",
            axum::routing::delete(projects::remove_member),
        )
        .route(
            "/{id}/manager",
            get(projects::manager)
                .put(projects::assign_manager)
                .delete(projects::remove_manager),
        )
        .route("/{id}/tickets", get(tickets::list_by_project))
        .route("/{id}/history", get(history::list_by_project))
}
