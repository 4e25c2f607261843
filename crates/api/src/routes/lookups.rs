//! Route definitions for the `/lookups` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::lookups;
use crate::state::AppState;

/// Routes mounted at `/lookups`. All seeded, all read-only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ticket-types", get(lookups::ticket_types))
        .route("/ticket-statuses", get(lookups::ticket_statuses))
        .route("/ticket-priorities", get(lookups::ticket_priorities))
        .route("/project-priorities", get(lookups::project_priorities))
        .route("/roles", get(lookups::roles))
}
