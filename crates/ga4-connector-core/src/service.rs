//! Report building and row shaping for the organic-search endpoints.

use std::sync::Arc;

use tracing::debug;

use crate::error::ReportError;
use crate::filters::organic_search_filter;
use crate::models::{OrganicLandingPageRecord, OrganicTrafficRecord};
use crate::report::{CellValue, ColumnHeader, DateRange, ReportClient, ReportQuery, ReportResponse};

pub const DEFAULT_LANDING_PAGE_LIMIT: i64 = 25;

const DIM_DATE: &str = "date";
const DIM_LANDING_PAGE: &str = "landingPagePlusQueryString";
const METRIC_SESSIONS: &str = "sessions";
const METRIC_ACTIVE_USERS: &str = "activeUsers";
const METRIC_CONVERSIONS: &str = "conversions";

/// Builds report queries, runs them through the shared [`ReportClient`] and
/// maps the rows into response records. Row order is always the backend's.
#[derive(Clone)]
pub struct ReportService {
    client: Arc<dyn ReportClient>,
}

impl ReportService {
    pub fn new(client: Arc<dyn ReportClient>) -> Self {
        Self { client }
    }

    /// Run a one-row query over yesterday..today and return how many rows
    /// came back. Zero rows still means the property is reachable.
    pub async fn test_connection(&self, property_id: &str) -> Result<usize, ReportError> {
        let query = ReportQuery::new(
            property_id,
            &[DIM_DATE],
            &[METRIC_SESSIONS],
            DateRange::new("yesterday", "today"),
        )
        .with_limit(1)?;

        let response = self.client.run_report(&query).await?;
        debug!(property_id, rows = response.rows.len(), "Connection test finished");
        Ok(response.rows.len())
    }

    /// Daily organic sessions and active users.
    pub async fn get_organic_traffic(
        &self,
        property_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<OrganicTrafficRecord>, ReportError> {
        let query = ReportQuery::new(
            property_id,
            &[DIM_DATE],
            &[METRIC_SESSIONS, METRIC_ACTIVE_USERS],
            DateRange::new(start_date, end_date),
        )
        .with_filter(organic_search_filter());

        let response = self.client.run_report(&query).await?;
        let layout = RowLayout::resolve(&query, &response);

        let records = response
            .rows
            .iter()
            .map(|row| {
                Ok(OrganicTrafficRecord {
                    date: layout.dimension(&row.dimension_values, DIM_DATE)?.to_string(),
                    sessions: parse_count(
                        METRIC_SESSIONS,
                        layout.metric(&row.metric_values, METRIC_SESSIONS)?,
                    )?,
                    active_users: parse_count(
                        METRIC_ACTIVE_USERS,
                        layout.metric(&row.metric_values, METRIC_ACTIVE_USERS)?,
                    )?,
                })
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        debug!(property_id, rows = records.len(), "Organic traffic report mapped");
        Ok(records)
    }

    /// Top landing pages by organic sessions, at most `limit` of them.
    pub async fn get_organic_landing_pages(
        &self,
        property_id: &str,
        start_date: &str,
        end_date: &str,
        limit: i64,
    ) -> Result<Vec<OrganicLandingPageRecord>, ReportError> {
        let query = ReportQuery::new(
            property_id,
            &[DIM_LANDING_PAGE],
            &[METRIC_SESSIONS, METRIC_ACTIVE_USERS, METRIC_CONVERSIONS],
            DateRange::new(start_date, end_date),
        )
        .with_filter(organic_search_filter())
        .order_by_metric_desc(METRIC_SESSIONS)
        .with_limit(limit)?;

        let response = self.client.run_report(&query).await?;
        let layout = RowLayout::resolve(&query, &response);

        let records = response
            .rows
            .iter()
            .map(|row| {
                Ok(OrganicLandingPageRecord {
                    landing_page: layout
                        .dimension(&row.dimension_values, DIM_LANDING_PAGE)?
                        .to_string(),
                    sessions: parse_count(
                        METRIC_SESSIONS,
                        layout.metric(&row.metric_values, METRIC_SESSIONS)?,
                    )?,
                    active_users: parse_count(
                        METRIC_ACTIVE_USERS,
                        layout.metric(&row.metric_values, METRIC_ACTIVE_USERS)?,
                    )?,
                    conversions: parse_amount(
                        METRIC_CONVERSIONS,
                        layout.metric(&row.metric_values, METRIC_CONVERSIONS)?,
                    )?,
                })
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        debug!(property_id, rows = records.len(), "Landing page report mapped");
        Ok(records)
    }
}

/// Where each requested column sits inside the returned rows.
///
/// Resolved by header name when the response carries headers; otherwise the
/// query's own column order is assumed.
struct RowLayout {
    dimensions: Vec<(String, usize)>,
    metrics: Vec<(String, usize)>,
}

impl RowLayout {
    fn resolve(query: &ReportQuery, response: &ReportResponse) -> Self {
        Self {
            dimensions: positions(
                query.dimensions().iter().map(|d| d.name.as_str()),
                &response.dimension_headers,
            ),
            metrics: positions(
                query.metrics().iter().map(|m| m.name.as_str()),
                &response.metric_headers,
            ),
        }
    }

    fn dimension<'r>(&self, values: &'r [CellValue], name: &str) -> Result<&'r str, ReportError> {
        cell(values, &self.dimensions, name)
    }

    fn metric<'r>(&self, values: &'r [CellValue], name: &str) -> Result<&'r str, ReportError> {
        cell(values, &self.metrics, name)
    }
}

fn positions<'a>(
    declared: impl Iterator<Item = &'a str>,
    headers: &[ColumnHeader],
) -> Vec<(String, usize)> {
    declared
        .enumerate()
        .map(|(pos, name)| {
            let idx = headers
                .iter()
                .position(|h| h.name == name)
                .unwrap_or(pos);
            (name.to_string(), idx)
        })
        .collect()
}

fn cell<'r>(
    values: &'r [CellValue],
    columns: &[(String, usize)],
    name: &str,
) -> Result<&'r str, ReportError> {
    columns
        .iter()
        .find(|(column, _)| column == name)
        .and_then(|(_, idx)| values.get(*idx))
        .map(|v| v.value.as_str())
        .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
}

fn parse_count(column: &str, raw: &str) -> Result<u64, ReportError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ReportError::MalformedValue {
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn parse_amount(column: &str, raw: &str) -> Result<f64, ReportError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ReportError::MalformedValue {
            column: column.to_string(),
            value: raw.to_string(),
        })
}
