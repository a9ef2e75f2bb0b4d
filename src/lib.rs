//! canopy-sim -- telemetry aggregation endpoint for drone-simulation tests.
//!
//! Simulator hosts report drone starts and periodic latency statistics keyed
//! by test name; the service keeps per-test state in memory for the life of
//! the process.

pub mod api;
pub mod config;
pub mod telemetry;

use std::sync::Arc;

use anyhow::Result;

use crate::config::ServiceConfig;

/// Start the canopy-sim service and serve until the listener fails.
pub async fn serve(config: &ServiceConfig) -> Result<()> {
    let registry = Arc::new(telemetry::Registry::new());
    let state = api::state::AppState::new(registry);
    let app = api::router(state, config.limits.max_body_bytes);

    let addr: std::net::SocketAddr = config.network.listen_address.parse()?;
    tracing::info!(%addr, "canopy-sim listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
