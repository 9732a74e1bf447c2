use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use ga4_connector_core::{
    report::MAX_REPORT_LIMIT, service::DEFAULT_LANDING_PAGE_LIMIT, validate::is_valid_date,
};

use crate::{error::AppError, state::AppState};

pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Use YYYY-MM-DD";

#[derive(Debug, Deserialize)]
pub struct TestConnectionRequest {
    pub property_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OrganicTrafficQuery {
    pub property_id: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct LandingPagesQuery {
    pub property_id: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_landing_page_limit")]
    pub limit: i64,
}

fn default_landing_page_limit() -> i64 {
    DEFAULT_LANDING_PAGE_LIMIT
}

fn validate_dates(start_date: &str, end_date: &str) -> Result<(), AppError> {
    if is_valid_date(start_date) && is_valid_date(end_date) {
        Ok(())
    } else {
        Err(AppError::BadRequest(INVALID_DATE_MESSAGE.to_string()))
    }
}

fn validate_limit(limit: i64) -> Result<(), AppError> {
    if (1..=MAX_REPORT_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_REPORT_LIMIT}"
        )))
    }
}

/// `POST /ga4/test-connection` - run a minimal report to confirm the
/// service account can read the property.
#[tracing::instrument(skip(state))]
pub async fn test_connection(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TestConnectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.reports.test_connection(&payload.property_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Successfully connected to GA4 property. Rows returned: {rows}")
    })))
}

/// `GET /ga4/organic-traffic` - daily organic sessions and active users.
#[tracing::instrument(skip(state))]
pub async fn organic_traffic(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OrganicTrafficQuery>,
) -> Result<impl IntoResponse, AppError> {
    validate_dates(&query.start_date, &query.end_date)?;
    let records = state
        .reports
        .get_organic_traffic(&query.property_id, &query.start_date, &query.end_date)
        .await?;
    Ok(Json(records))
}

/// `GET /ga4/organic-landing-pages` - top landing pages by organic sessions.
#[tracing::instrument(skip(state))]
pub async fn organic_landing_pages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LandingPagesQuery>,
) -> Result<impl IntoResponse, AppError> {
    validate_limit(query.limit)?;
    validate_dates(&query.start_date, &query.end_date)?;
    let records = state
        .reports
        .get_organic_landing_pages(
            &query.property_id,
            &query.start_date,
            &query.end_date,
            query.limit,
        )
        .await?;
    Ok(Json(records))
}
