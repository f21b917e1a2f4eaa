//! Booking Analytics HTTP Server Binary
//!
//! This is the main entry point for the booking analytics REST API server.
//! It loads the configuration, publishes the working dataset, sets up the HTTP
//! router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! DATASET_PATH=data/hotel_bookings.csv GEMINI_API_KEY=... \
//!   cargo run --bin booking-server
//! ```
//!
//! # Environment Variables
//!
//! - `BOOKING_CONFIG`: Path to a `booking-analytics.toml` file
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `DATASET_PATH`: Working dataset file (default: hotel_bookings.csv)
//! - `GEMINI_API_KEY` / `GOOGLE_API_KEY`: Enables the /v1/ask endpoint
//! - `RUST_LOG`: Log filter directives, e.g. `booking_analytics=debug,tower_http=warn` (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use booking_analytics::assistant::generator_from_config;
use booking_analytics::config::AppConfig;
use booking_analytics::http::{create_router, AppState};
use booking_analytics::services::AnalyticsService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(log_filter(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting booking analytics server");

    let config = AppConfig::load()?;
    info!(
        dataset = %config.dataset.path.display(),
        horizon = config.forecast.horizon,
        min_history_points = config.forecast.min_history_points,
        require_forecast = config.forecast.require_forecast,
        "Configuration loaded"
    );

    let generator = generator_from_config(&config);
    let service = Arc::new(AnalyticsService::from_config(&config, generator));

    // The server still starts without a dataset; reads answer 503 until an upload succeeds.
    let loader = Arc::clone(&service);
    match tokio::task::spawn_blocking(move || loader.load_working_file()).await? {
        Ok(version) => info!(version = version.sequence, rows = version.rows, "Working dataset published"),
        Err(e) => warn!(error = %e, "Working dataset not loaded; waiting for an upload"),
    }

    // Create application state
    let state = AppState::from_config(service, &config);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Filter from `RUST_LOG`-style directives; `info` when unset or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
