use std::sync::Arc;

use crate::config::ServerConfig;
use crate::email::InviteMailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bugtrail_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound invite mailer; `None` when SMTP is not configured.
    pub mailer: Option<Arc<InviteMailer>>,
}
