//! Report query and response types, and the client abstraction that runs them.
//!
//! The serde layout matches the Analytics Data API `runReport` JSON body and
//! response, so a client implementation can post a [`ReportQuery`] as-is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, ReportError};

/// Largest row count a single report may request.
pub const MAX_REPORT_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub name: String,
}

/// Inclusive date range. Each bound is either a `YYYY-MM-DD` literal or a
/// relative keyword the backend understands (`today`, `yesterday`, `7daysAgo`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFilter {
    pub match_type: MatchType,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_name: String,
    pub string_filter: StringFilter,
}

/// A dimension filter. Only the single-field form is modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterExpression {
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricOrderBy {
    pub metric_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub metric: MetricOrderBy,
    pub desc: bool,
}

/// One `runReport` request.
///
/// The property travels in the URL path, not the body, so it is skipped by
/// serde. Fields are private so the limit bound holds for every instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(skip)]
    property: String,
    dimensions: Vec<Dimension>,
    metrics: Vec<Metric>,
    date_ranges: Vec<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimension_filter: Option<FilterExpression>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_bys: Vec<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<i64>,
}

impl ReportQuery {
    pub fn new(
        property: impl Into<String>,
        dimensions: &[&str],
        metrics: &[&str],
        date_range: DateRange,
    ) -> Self {
        Self {
            property: property.into(),
            dimensions: dimensions
                .iter()
                .map(|name| Dimension {
                    name: name.to_string(),
                })
                .collect(),
            metrics: metrics
                .iter()
                .map(|name| Metric {
                    name: name.to_string(),
                })
                .collect(),
            date_ranges: vec![date_range],
            dimension_filter: None,
            order_bys: Vec::new(),
            limit: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterExpression) -> Self {
        self.dimension_filter = Some(filter);
        self
    }

    pub fn order_by_metric_desc(mut self, metric_name: &str) -> Self {
        self.order_bys.push(OrderBy {
            metric: MetricOrderBy {
                metric_name: metric_name.to_string(),
            },
            desc: true,
        });
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Result<Self, QueryError> {
        if !(1..=MAX_REPORT_LIMIT).contains(&limit) {
            return Err(QueryError::LimitOutOfRange {
                got: limit,
                max: MAX_REPORT_LIMIT,
            });
        }
        self.limit = Some(limit);
        Ok(self)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn date_ranges(&self) -> &[DateRange] {
        &self.date_ranges
    }

    pub fn dimension_filter(&self) -> Option<&FilterExpression> {
        self.dimension_filter.as_ref()
    }

    pub fn order_bys(&self) -> &[OrderBy] {
        &self.order_bys
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellValue {
    #[serde(default)]
    pub value: String,
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

/// One returned row. Values are positional and line up with the response
/// headers (or, when headers are absent, with the query's column order).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(default)]
    pub dimension_values: Vec<CellValue>,
    #[serde(default)]
    pub metric_values: Vec<CellValue>,
}

impl ReportRow {
    pub fn new(dimensions: &[&str], metrics: &[&str]) -> Self {
        Self {
            dimension_values: dimensions.iter().map(|v| CellValue::from(*v)).collect(),
            metric_values: metrics.iter().map(|v| CellValue::from(*v)).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHeader {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    #[serde(default)]
    pub dimension_headers: Vec<ColumnHeader>,
    #[serde(default)]
    pub metric_headers: Vec<ColumnHeader>,
    /// The backend omits `rows` entirely when nothing matched.
    #[serde(default)]
    pub rows: Vec<ReportRow>,
    #[serde(default)]
    pub row_count: Option<i64>,
}

impl ReportResponse {
    pub fn from_rows(rows: Vec<ReportRow>) -> Self {
        Self {
            row_count: Some(rows.len() as i64),
            rows,
            ..Self::default()
        }
    }
}

/// Runs report queries against the analytics backend.
///
/// Implementations are shared across concurrent requests and must not keep
/// per-call mutable state visible to callers.
#[async_trait]
pub trait ReportClient: Send + Sync + 'static {
    async fn run_report(&self, query: &ReportQuery) -> Result<ReportResponse, ReportError>;
}
