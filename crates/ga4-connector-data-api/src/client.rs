use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use ga4_connector_core::{
    config::Config,
    error::{QueryError, ReportError},
    report::{ReportClient, ReportQuery, ReportResponse},
};

use crate::credentials::ServiceAccountKey;
use crate::token::{AccessTokenSource, ServiceAccountTokenSource};

const CONNECT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

/// [`ReportClient`] for the Analytics Data API `v1beta` `runReport` method.
///
/// Cheap to share: one instance is built at startup and handed to the
/// report service behind an `Arc`.
pub struct DataApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn AccessTokenSource>,
}

impl DataApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Build the client from the configured service-account key.
    ///
    /// Fails if the key file is missing, unreadable or holds an unusable
    /// private key; the server must not start without working credentials.
    pub fn from_config(config: &Config) -> Result<Self> {
        let key = ServiceAccountKey::from_file(&config.credentials_path)?;
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS))
            .user_agent(concat!("ga4-connector/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        let tokens = ServiceAccountTokenSource::new(http.clone(), key)?;
        info!(
            client_email = %tokens.client_email(),
            data_api_url = %config.data_api_url,
            "Data API client ready"
        );
        Ok(Self::new(http, config.data_api_url.clone(), Arc::new(tokens)))
    }

    fn run_report_url(&self, property_id: &str) -> Result<String, QueryError> {
        Ok(format!(
            "{}/v1beta/{}:runReport",
            self.base_url,
            property_resource(property_id)?
        ))
    }
}

/// Resource name for a property. Bare numeric ids are accepted and prefixed.
///
/// The id lands in the URL path, so anything but digits is rejected.
pub fn property_resource(property_id: &str) -> Result<String, QueryError> {
    let trimmed = property_id.trim();
    let id = trimmed.strip_prefix("properties/").unwrap_or(trimmed);
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QueryError::InvalidProperty(property_id.to_string()));
    }
    Ok(format!("properties/{id}"))
}

fn api_error(status: StatusCode, body: &str) -> ReportError {
    let status_code = i64::from(status.as_u16());
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let message = if envelope.error.message.is_empty() {
                status.to_string()
            } else {
                envelope.error.message
            };
            ReportError::api(Some(envelope.error.code.unwrap_or(status_code)), message)
        }
        Err(_) => {
            let trimmed = body.trim();
            let message = if trimmed.is_empty() {
                status.to_string()
            } else {
                trimmed.to_string()
            };
            ReportError::api(Some(status_code), message)
        }
    }
}

#[async_trait]
impl ReportClient for DataApiClient {
    #[tracing::instrument(skip(self, query), fields(property = %query.property()))]
    async fn run_report(&self, query: &ReportQuery) -> Result<ReportResponse, ReportError> {
        let token = self.tokens.access_token().await?;
        let url = self.run_report_url(query.property())?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(query)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "runReport request failed");
                ReportError::api(None, e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = api_error(status, &body);
            warn!(status = %status, error = %err, "runReport rejected");
            return Err(err);
        }

        let report: ReportResponse = response
            .json()
            .await
            .map_err(|e| ReportError::api(None, format!("invalid runReport response: {e}")))?;
        debug!(rows = report.rows.len(), "runReport succeeded");
        Ok(report)
    }
}
