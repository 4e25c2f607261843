//! Route definitions for the `/invites` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::invites;
use crate::state::AppState;

/// Routes mounted at `/invites`.
///
/// ```text
/// GET    /           -> list (admin)
/// POST   /           -> create (admin)
/// GET    /validate   -> validate (public)
/// GET    /{id}       -> get_by_id (admin)
/// DELETE /{id}       -> cancel (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(invites::list).post(invites::create))
        .route("/validate", get(invites::validate))
        .route("/{id}", get(invites::get_by_id).delete(invites::cancel))
}
