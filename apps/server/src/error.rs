//! Error types for the HTTP API.
//!
//! Every error renders as `{"detail": "<message>"}` with an appropriate
//! status code, which is what the frontend expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use infinity_core::CoreError;
use infinity_db::DbError;

/// HTTP API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 - Malformed or rejected request (includes stock shortfalls and
    /// conflicts like duplicate usernames).
    #[error("{0}")]
    BadRequest(String),

    /// 401 - Missing, malformed, or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// 404 - Referenced entity doesn't exist.
    #[error("{0}")]
    NotFound(String),

    /// 500 - Anything the client can't fix.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details go to the log, not the wire.
        let detail = match &self {
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Maps database-layer failures onto HTTP semantics.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{entity} not found: {id}"))
            }
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            DbError::Domain(core) => core.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        // All business-rule violations are the client's problem.
        ApiError::BadRequest(err.to_string())
    }
}

impl From<infinity_core::ValidationError> for ApiError {
    fn from(err: infinity_core::ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
