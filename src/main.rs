// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use grafana_panel_data::infrastructure::config::load_app_config;
use grafana_panel_data::infrastructure::grafana_client::GrafanaClient;
use grafana_panel_data::presentation::app_state::AppState;
use grafana_panel_data::presentation::routes::build_router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = load_app_config()?;

    // Create Grafana client (infrastructure layer)
    let client = Arc::new(GrafanaClient::from_settings(&config.grafana)?);
    tracing::info!(host = client.host(), "using grafana");

    // Create services (application layer)
    let state = Arc::new(AppState::new(client));

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.listen_addr.parse()?;
    tracing::info!(%addr, "starting grafana-panel-data service");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
