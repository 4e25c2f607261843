//! Route definitions for the `/company` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Routes mounted at `/company`.
///
/// ```text
/// GET /                       -> get_own
/// GET /members                -> members
/// GET /members/role/{role}    -> members_by_role
/// PUT /members/{id}/role      -> update_member_role (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(companies::get_own))
        .route("/members", get(companies::members))
        .route("/members/role/{role}", get(companies::members_by_role))
        .route("/members/{id}/role", put(companies::update_member_role))
}
