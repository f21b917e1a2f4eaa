//! Service layer for analytics computation and orchestration.
//!
//! The pipeline runs leaf-first: [`metrics`] derives the summary statistics and
//! the monthly revenue series, [`forecast`] fits the revenue model, and
//! [`snapshot`] bundles both into an immutable snapshot published atomically.
//! [`analytics`] is the facade the HTTP layer talks to.

pub mod analytics;
pub mod forecast;
pub mod metrics;
pub mod snapshot;

pub use analytics::{AnalyticsError, AnalyticsService, AskError};
pub use forecast::{ForecastEngine, ForecastError, ForecastPoint, ForecastResult, Forecaster};
pub use metrics::{EmptyDatasetError, Metrics};
pub use snapshot::{AnalyticsSnapshot, DatasetVersion, PublishError, PublishOptions, SnapshotPublisher};
