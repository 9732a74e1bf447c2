use std::sync::Arc;

use ga4_connector_core::{config::Config, service::ReportService};

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// Built once in `main`; the report service owns the single backend client
/// that every request reuses.
pub struct AppState {
    pub reports: ReportService,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(reports: ReportService, config: Config) -> Self {
        Self {
            reports,
            config: Arc::new(config),
        }
    }
}
