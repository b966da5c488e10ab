use atelier_cloud::ObjectStoreError;
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::DbError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::workflow::WorkflowError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `atelier_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The object store rejected or failed a write.
    #[error("Storage error: {0}")]
    Storage(#[from] ObjectStoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => AppError::Core(core),
            DbError::Sqlx(sqlx) => AppError::Database(sqlx),
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Core(core) => AppError::Core(core),
            WorkflowError::Database(sqlx) => AppError::Database(sqlx),
            WorkflowError::Storage(storage) => AppError::Storage(storage),
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Membership conflicts name the offending print.
        let mut print_id: Option<DbId> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::ArtistNotFound { .. } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "No artist is registered for this account".to_string(),
                ),
                CoreError::DuplicateMember {
                    print_id: offender, ..
                } => {
                    print_id = Some(*offender);
                    (StatusCode::CONFLICT, "DUPLICATE_MEMBER", core.to_string())
                }
                CoreError::MemberNotInParent {
                    print_id: offender, ..
                } => {
                    print_id = Some(*offender);
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "MEMBER_NOT_IN_PARENT",
                        core.to_string(),
                    )
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Object storage ---
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Object storage error");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(id) = print_id {
            body["print_id"] = json!(id);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_hides_ownership() {
        let (status, body) = render(
            CoreError::NotFound {
                entity: "Gallery",
                id: 7,
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["error"], "Gallery with id 7 not found");
    }

    #[tokio::test]
    async fn missing_artist_is_not_found() {
        let (status, body) = render(
            CoreError::ArtistNotFound {
                external_id: "kc-123".into(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        // The subject is not echoed back.
        assert!(!body["error"].as_str().unwrap().contains("kc-123"));
    }

    #[tokio::test]
    async fn membership_errors_name_the_print() {
        let (status, body) = render(
            CoreError::MemberNotInParent {
                gallery_id: 1,
                print_id: 42,
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "MEMBER_NOT_IN_PARENT");
        assert_eq!(body["print_id"], 42);

        let (status, body) = render(
            CoreError::DuplicateMember {
                gallery_id: 1,
                print_id: 9,
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_MEMBER");
        assert_eq!(body["print_id"], 9);
    }

    #[tokio::test]
    async fn validation_is_bad_request() {
        let (status, body) = render(CoreError::Validation("title is required".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body.get("print_id").is_none());
    }

    #[tokio::test]
    async fn storage_failures_are_sanitised() {
        let (status, body) =
            render(ObjectStoreError::Backend("bucket credentials expired".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal error occurred");
    }

    #[tokio::test]
    async fn db_error_unwraps_core() {
        let err: AppError = DbError::Core(CoreError::Forbidden("no".into())).into();
        let (status, _) = render(err).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
