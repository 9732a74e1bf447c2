use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use ga4_connector_core::{config::Config, service::ReportService};
use ga4_connector_data_api::DataApiClient;
use ga4_connector_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal; anything else (bad syntax) is worth a note.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: could not load .env file: {e}");
        }
    }

    // Initialise structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ga4_connector=info".parse()?),
        )
        .json()
        .init();

    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // The client is the only backend handle; without credentials the server
    // must not start.
    let client = DataApiClient::from_config(&cfg)?;
    let reports = ReportService::new(Arc::new(client));
    let state = Arc::new(AppState::new(reports, cfg.clone()));

    let addr = cfg.bind_addr();
    let app = ga4_connector_server::app::build_app(state);

    info!(port = cfg.port, "GA4 connector listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
