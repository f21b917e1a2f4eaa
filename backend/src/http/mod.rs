//! HTTP server module for the booking analytics backend.
//!
//! This module provides an axum-based HTTP server that exposes the analytics
//! service as a REST API consumed by the dashboard.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON serialization, presentation rounding              │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  AnalyticsService                                         │
//! │  - Snapshot reads, dataset replacement, questions         │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  SnapshotPublisher + DatasetStore                         │
//! │  - Parse, metrics, forecast, atomic swap                  │
//! │  - Working dataset file                                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
