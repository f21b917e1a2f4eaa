//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for the dashboard, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.upload_limit;

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        .route("/analytics", get(handlers::get_analytics))
        .route("/revenue/monthly", get(handlers::get_monthly_revenue))
        .route("/revenue/forecast", get(handlers::get_forecast))
        .route("/cancellations/monthly", get(handlers::get_monthly_cancellations))
        .route(
            "/dataset",
            get(handlers::get_dataset).post(handlers::upload_dataset),
        )
        .route("/ask", post(handlers::ask));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
