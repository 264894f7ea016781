//! Arthouse API Server Entry Point
//!
//! Reads configuration from the environment, opens the store, builds the
//! cache and serves the router until Ctrl-C.

use arthouse_api::telemetry::{init_tracing, TelemetryConfig};
use arthouse_api::{create_api_router, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&TelemetryConfig::default())?;

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr()?;
    let state = AppState::from_config(&config).await?;
    let app = create_api_router(state, &config);

    tracing::info!(%addr, store = ?config.store.uri, cache = ?config.cache_backend.kind, "Starting Arthouse API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
