//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::AnalyticsService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Analytics service owning the published snapshot
    pub service: Arc<AnalyticsService>,
    /// Largest accepted request body, in bytes
    pub upload_limit: usize,
}

impl AppState {
    /// Create a new application state around the given service.
    pub fn new(service: Arc<AnalyticsService>, upload_limit: usize) -> Self {
        Self {
            service,
            upload_limit,
        }
    }

    /// Create the state described by `config`.
    pub fn from_config(service: Arc<AnalyticsService>, config: &AppConfig) -> Self {
        Self::new(service, config.server.max_upload_bytes)
    }
}
