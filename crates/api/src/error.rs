//! HTTP error mapping for the api crate.
//!
//! Handlers return [`AppResult`]; every failure funnels through [`AppError`]
//! and renders as `{ "error": <message>, "code": <code> }`. The `code`
//! strings are part of the client contract and must stay stable.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bugtrail_core::error::CoreError;
use serde_json::json;

/// Everything a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain failure from `bugtrail_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure, classified further when rendered.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed input outside what request validation covers (bad
    /// multipart fields, unparseable values).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Anything that should never happen in a healthy deployment.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Handler result alias.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Resolve the response status, stable code, and client-facing message.
    ///
    /// Internal detail never reaches the client: 500s all render the same
    /// generic body, with the cause logged server-side.
    fn render(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Core(CoreError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Internal core error");
                internal()
            }
            AppError::Database(err) => classify_database_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.render();
        let body = json!({
            "error": message,
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}

/// The one generic 500 body.
fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx failure.
///
/// `RowNotFound` is a plain 404. A Postgres unique violation (23505) on one
/// of the schema's `uq_` constraints is a lost insert race and maps to 409
/// with domain wording. Everything else is a logged 500.
fn classify_database_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
        {
            let constraint = db_err.constraint().unwrap_or_default();
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                conflict_message(constraint),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

/// Domain wording for unique-constraint races.
fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_users_email" => "A user with this email already exists".to_string(),
        "uq_invites_company_token" => "Invite token is already in use".to_string(),
        other => format!("Duplicate value for {other}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn rendered(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_names_entity_and_id() {
        let err = AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id: 42,
        });
        let (status, json) = rendered(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["error"], "Ticket with id 42 not found");
    }

    #[tokio::test]
    async fn conflict_passes_message_through() {
        let err = AppError::Core(CoreError::Conflict("Invite was already redeemed".into()));
        let (status, json) = rendered(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "CONFLICT");
        assert_eq!(json["error"], "Invite was already redeemed");
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let err = AppError::InternalError("connection pool exhausted".into());
        let (status, json) = rendered(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");
    }

    #[test]
    fn duplicate_email_reads_as_domain_conflict() {
        assert_eq!(
            conflict_message("uq_users_email"),
            "A user with this email already exists"
        );
        assert!(conflict_message("uq_somewhere_else").contains("uq_somewhere_else"));
    }
}
