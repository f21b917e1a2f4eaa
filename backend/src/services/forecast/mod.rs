//! Revenue forecasting over the monthly revenue series.
//!
//! The engine owns the parts every model shares: validating the horizon,
//! enforcing the minimum history, and laying out the forecast months one
//! after another starting right after the last observed month. The model
//! itself sits behind the [`Forecaster`] trait so it can be swapped without
//! touching the publish pipeline. The default is [`EtsForecaster`], built on
//! `augurs`.

pub mod ets;

pub use ets::EtsForecaster;

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::models::{MonthKey, MonthlyRevenueSeries};

/// Forecast length when the caller does not ask for one.
pub const DEFAULT_HORIZON: usize = 12;

/// Fewest distinct months a forecast is fitted on.
pub const DEFAULT_MIN_HISTORY_POINTS: usize = 2;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("Insufficient history for forecasting: need at least {required} months, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("Invalid forecast horizon: {0}")]
    InvalidHorizon(usize),

    #[error("Forecast model failed: {0}")]
    Model(String),
}

impl ForecastError {
    pub fn code(&self) -> &'static str {
        match self {
            ForecastError::InsufficientHistory { .. } => "INSUFFICIENT_HISTORY",
            ForecastError::InvalidHorizon(_) => "INVALID_HORIZON",
            ForecastError::Model(_) => "FORECAST_FAILED",
        }
    }
}

/// One predicted month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub month: MonthKey,
    /// First day of `month`.
    pub date: NaiveDate,
    pub predicted_revenue: f64,
}

/// Predictions for consecutive months following the last observed month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub model: String,
    pub points: Vec<ForecastPoint>,
}

impl ForecastResult {
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn first_month(&self) -> Option<MonthKey> {
        self.points.first().map(|p| p.month)
    }
}

/// A model that can be fitted to a chronological monthly history.
pub trait Forecaster: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Fit on `(month, value)` pairs sorted ascending by month, with distinct months.
    fn fit(&self, history: &[(MonthKey, f64)]) -> Result<Box<dyn FittedModel>, ForecastError>;
}

/// A fitted model predicting the months right after the fitted history.
pub trait FittedModel {
    /// Name of the model that was actually fitted, reported in [`ForecastResult::model`].
    fn model(&self) -> &'static str;

    /// One value per month for the `horizon` months following the history.
    fn predict(&mut self, horizon: usize) -> Result<Vec<f64>, ForecastError>;
}

/// Fits a [`Forecaster`] to a revenue series and extracts the forward predictions.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    forecaster: Arc<dyn Forecaster>,
    min_history_points: usize,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(
            Arc::new(EtsForecaster::default()),
            DEFAULT_MIN_HISTORY_POINTS,
        )
    }
}

impl ForecastEngine {
    pub fn new(forecaster: Arc<dyn Forecaster>, min_history_points: usize) -> Self {
        Self {
            forecaster,
            min_history_points,
        }
    }

    pub fn model_name(&self) -> &'static str {
        self.forecaster.name()
    }

    pub fn min_history_points(&self) -> usize {
        self.min_history_points
    }

    /// Fit on `series` and predict `horizon` months after its last month.
    pub fn fit_and_predict(
        &self,
        series: &MonthlyRevenueSeries,
        horizon: usize,
    ) -> Result<ForecastResult, ForecastError> {
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon(horizon));
        }

        let history = series.points();
        if history.len() < self.min_history_points {
            return Err(ForecastError::InsufficientHistory {
                required: self.min_history_points,
                actual: history.len(),
            });
        }
        let last = match series.last_month() {
            Some(month) => month,
            None => {
                return Err(ForecastError::InsufficientHistory {
                    required: self.min_history_points.max(1),
                    actual: 0,
                })
            }
        };

        let mut model = self.forecaster.fit(&history)?;
        let predictions = model.predict(horizon)?;
        if predictions.len() != horizon {
            return Err(ForecastError::Model(format!(
                "{} returned {} predictions for a horizon of {}",
                model.model(),
                predictions.len(),
                horizon
            )));
        }

        let mut points = Vec::with_capacity(horizon);
        let mut month = last;
        for predicted_revenue in predictions {
            month = month
                .succ()
                .ok_or_else(|| ForecastError::Model(format!("month after {} is out of range", month)))?;
            if !predicted_revenue.is_finite() {
                return Err(ForecastError::Model(format!(
                    "non-finite prediction for {}",
                    month
                )));
            }
            points.push(ForecastPoint {
                month,
                date: month.first_day(),
                predicted_revenue,
            });
        }

        Ok(ForecastResult {
            model: model.model().to_string(),
            points,
        })
    }
}

#[cfg(test)]
#[path = "forecast_tests.rs"]
mod forecast_tests;
