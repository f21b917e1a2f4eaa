//! Data Transfer Objects for the HTTP API.
//!
//! Monetary and percentage values are rounded to two decimals here and only
//! here; the snapshot keeps full precision.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::services::forecast::ForecastResult;
use crate::services::metrics::{LeadTimeStats, TopCountries};
use crate::services::snapshot::{AnalyticsSnapshot, DatasetVersion};
use crate::models::MonthlySeries;

/// Round to two decimals for presentation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn rounded(series: &MonthlySeries) -> BTreeMap<String, f64> {
    series
        .iter()
        .map(|(month, value)| (month.to_string(), round2(value)))
        .collect()
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Sequence of the published dataset, if one is loaded
    pub dataset_version: Option<u64>,
    /// Name of the answer generator behind /v1/ask
    pub assistant: String,
}

/// Dashboard summary.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResponse {
    pub dataset_version: u64,
    pub total_bookings: usize,
    pub total_revenue: f64,
    /// Revenue per `YYYY-MM`
    pub revenue_trends: BTreeMap<String, f64>,
    /// Formatted percentage, e.g. `"37.04%"`
    pub cancellation_rate: String,
    pub top_countries: TopCountries,
    pub lead_time_distribution: LeadTimeStats,
}

impl From<&AnalyticsSnapshot> for AnalyticsResponse {
    fn from(snapshot: &AnalyticsSnapshot) -> Self {
        let metrics = &snapshot.metrics;
        let stats = &metrics.lead_time_stats;
        Self {
            dataset_version: snapshot.version.sequence,
            total_bookings: metrics.total_bookings,
            total_revenue: round2(metrics.total_revenue),
            revenue_trends: rounded(&snapshot.monthly_revenue),
            cancellation_rate: format!("{:.2}%", metrics.cancellation_rate),
            top_countries: metrics.top_countries.clone(),
            lead_time_distribution: LeadTimeStats {
                count: stats.count,
                mean: round2(stats.mean),
                std: stats.std.map(round2),
                min: stats.min,
                p25: round2(stats.p25),
                median: round2(stats.median),
                p75: round2(stats.p75),
                max: stats.max,
            },
        }
    }
}

/// Monthly series keyed by `YYYY-MM`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySeriesResponse(pub BTreeMap<String, f64>);

impl From<&MonthlySeries> for MonthlySeriesResponse {
    fn from(series: &MonthlySeries) -> Self {
        Self(rounded(series))
    }
}

/// Forecast keyed by the first day of each month (`YYYY-MM-DD`).
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    pub model: String,
    pub forecast: BTreeMap<String, f64>,
}

impl From<&ForecastResult> for ForecastResponse {
    fn from(result: &ForecastResult) -> Self {
        Self {
            model: result.model.clone(),
            forecast: result
                .points
                .iter()
                .map(|p| (p.date.format("%Y-%m-%d").to_string(), round2(p.predicted_revenue)))
                .collect(),
        }
    }
}

/// Currently published dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfoResponse {
    #[serde(flatten)]
    pub version: DatasetVersion,
    pub months: usize,
    pub first_month: Option<String>,
    pub last_month: Option<String>,
}

impl From<&AnalyticsSnapshot> for DatasetInfoResponse {
    fn from(snapshot: &AnalyticsSnapshot) -> Self {
        Self {
            version: snapshot.version.clone(),
            months: snapshot.monthly_revenue.len(),
            first_month: snapshot.monthly_revenue.first_month().map(|m| m.to_string()),
            last_month: snapshot.monthly_revenue.last_month().map(|m| m.to_string()),
        }
    }
}

/// Response for a dataset upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub version: DatasetVersion,
}

/// Request body for the ask endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(37.037037), 37.04);
        assert_eq!(round2(-12.764), -12.76);
        assert_eq!(round2(300.0), 300.0);
    }

    #[test]
    fn test_ask_request_query_optional() {
        let request: AskRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.query, None);

        let request: AskRequest = serde_json::from_str(r#"{"query":"hi"}"#).unwrap();
        assert_eq!(request.query.as_deref(), Some("hi"));
    }
}
