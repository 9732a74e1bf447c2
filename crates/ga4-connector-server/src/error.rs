use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use ga4_connector_core::error::{map_error, MappedError, ReportError};

/// Application-level errors that map directly to HTTP responses.
///
/// Every variant implements [`IntoResponse`] so Axum handlers can use
/// `Result<impl IntoResponse, AppError>` as their return type. The body is
/// always `{"detail": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before any backend call.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The analytics backend failed with a declared status code, already
    /// translated for the caller.
    #[error("upstream error {}: {}", .0.status, .0.message)]
    Upstream(MappedError),

    /// Anything else. The raw message is returned to the caller.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Api { code, message } => AppError::Upstream(map_error(code, &message)),
            ReportError::InvalidQuery(e) => AppError::BadRequest(e.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(mapped) => {
                let status = StatusCode::from_u16(mapped.status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                tracing::warn!(status = %status, "GA4 request failed: {}", mapped.message);
                (status, mapped.message)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
