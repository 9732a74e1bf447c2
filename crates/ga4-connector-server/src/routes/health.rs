use axum::{response::IntoResponse, Json};
use serde_json::json;

/// `GET /health`: liveness check.
///
/// Always `200 OK`; it does not touch the analytics backend.
///
/// Response shape:
/// ```json
/// { "status": "ok" }
/// ```
#[tracing::instrument]
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
