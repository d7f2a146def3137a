//! Rides API Server
//!
//! Read-only analytics over the bike-share rides table.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use rides_api::config::ApiConfig;
use rides_api::state::AppState;
use rides_api::{metrics, routes};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = ApiConfig::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = config.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(config))
}

async fn run_server(config: ApiConfig) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics::install_recorder()?;
    info!("Prometheus metrics exporter initialized");
    info!("Starting rides API server");

    let state = match AppState::from_config(&config).await {
        Ok(state) => Arc::new(state.with_prometheus(prometheus_handle)),
        Err(e) => {
            tracing::error!("Failed to initialize application state: {:#}", e);
            return Err(e);
        }
    };

    let app = routes::router(state);

    let addr = config.listen_addr()?;
    info!("Rides API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
