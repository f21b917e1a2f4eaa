//! # Booking Analytics Backend
//!
//! Hotel booking analytics and revenue forecasting engine.
//!
//! This crate ingests a hotel booking dataset (CSV), computes summary analytics,
//! fits a forecast of monthly revenue, and exposes the results, together with a
//! natural-language question endpoint, through a REST API built on Axum.
//!
//! ## Features
//!
//! - **Data Loading**: Parse booking CSVs with per-column fallbacks and derived columns
//! - **Metrics**: Cancellation rate, top countries, lead-time statistics, monthly series
//! - **Forecasting**: Linear trend with yearly seasonality behind a pluggable trait
//! - **Snapshots**: Derived analytics published atomically on every dataset change
//! - **Assistant**: Prompts grounded in the current analytics, answered by Gemini
//! - **HTTP API**: RESTful endpoints for the dashboard
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Booking records, datasets, months and monthly series
//! - [`parsing`]: CSV loading and re-serialization
//! - [`store`]: Working dataset file and checksums
//! - [`services`]: Metrics, forecasting, snapshot publishing and the service facade
//! - [`assistant`]: Prompt building and answer generators
//! - [`config`]: TOML and environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod assistant;
pub mod config;
pub mod models;
pub mod parsing;
pub mod services;
pub mod store;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(test)]
mod test_support;
