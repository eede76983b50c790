// Report Server Binary Entry Point
//
// Purpose: serve the strategy reports (HTML pages + JSON navigation API)
// Usage: cargo run --features api --bin report_server

use std::net::SocketAddr;

use strategy_reports::config::{self, ServerConfig};
use strategy_reports::logging;
use strategy_reports::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    logging::init(logging::SERVER_FILTER);

    tracing::info!("Starting report server...");

    let config = ServerConfig::from_env()?;
    tracing::info!("Configuration:");
    tracing::info!("  REPORTS_DIR: {}", config.reports_dir.display());
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  BASE_PATH: {:?}", config.base_path);

    let state = AppState::new(&config)?;
    tracing::info!("Serving {} report(s)", state.catalog.len());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
