//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login             -> login
/// POST /refresh           -> refresh
/// POST /register          -> register (invite token)
/// POST /register-company  -> register_company (new tenant bootstrap)
/// POST /logout            -> logout (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/register", post(auth::register))
        .route("/register-company", post(auth::register_company))
        .route("/logout", post(auth::logout))
}
