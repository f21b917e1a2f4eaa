//! Read and replace operations over the published analytics.
//!
//! [`AnalyticsService`] is the single entry point used by the HTTP layer. It
//! owns the snapshot publisher and the answer generator; reads clone what they
//! need out of the current snapshot and never block on a publish in progress.

use std::sync::Arc;
use tracing::info;

use crate::assistant::{build_prompt, AnswerGenerator, DisabledGenerator, GenerationError};
use crate::config::AppConfig;
use crate::models::{MonthlyRevenueSeries, MonthlySeries};
use crate::services::forecast::{EtsForecaster, ForecastEngine, ForecastError, ForecastResult};
use crate::services::metrics::Metrics;
use crate::services::snapshot::{
    AnalyticsSnapshot, DatasetVersion, PublishError, PublishOptions, SnapshotPublisher,
};
use crate::store::DatasetStore;

/// Longest accepted question, in characters.
pub const MAX_QUESTION_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsError {
    #[error("No dataset has been loaded yet")]
    NotReady,

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

#[derive(Debug, thiserror::Error)]
pub enum AskError {
    #[error("Query cannot be empty")]
    EmptyQuestion,

    #[error("Query is longer than {max} characters")]
    QuestionTooLong { max: usize },

    #[error("No dataset has been loaded yet")]
    NotReady,

    #[error("Answer generation failed: {0}")]
    Generation(#[from] GenerationError),
}

pub struct AnalyticsService {
    publisher: SnapshotPublisher,
    generator: Arc<dyn AnswerGenerator>,
}

impl AnalyticsService {
    pub fn new(publisher: SnapshotPublisher, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self {
            publisher,
            generator,
        }
    }

    /// Service with default forecasting, no working file and no answer generator.
    pub fn in_memory() -> Self {
        Self::new(
            SnapshotPublisher::new(PublishOptions::default(), None),
            Arc::new(DisabledGenerator),
        )
    }

    /// Wire up the service described by `config`. Nothing is loaded yet.
    pub fn from_config(config: &AppConfig, generator: Arc<dyn AnswerGenerator>) -> Self {
        let options = PublishOptions {
            engine: ForecastEngine::new(
                Arc::new(EtsForecaster::default()),
                config.forecast.min_history_points,
            ),
            horizon: config.forecast.horizon,
            require_forecast: config.forecast.require_forecast,
        };
        let store = DatasetStore::new(config.dataset.path.clone());
        Self::new(SnapshotPublisher::new(options, Some(store)), generator)
    }

    pub fn publisher(&self) -> &SnapshotPublisher {
        &self.publisher
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub fn snapshot(&self) -> Result<Arc<AnalyticsSnapshot>, AnalyticsError> {
        self.publisher.current().ok_or(AnalyticsError::NotReady)
    }

    pub fn dataset_version(&self) -> Option<DatasetVersion> {
        self.publisher.current().map(|s| s.version.clone())
    }

    pub fn get_metrics_snapshot(&self) -> Result<Metrics, AnalyticsError> {
        Ok(self.snapshot()?.metrics.clone())
    }

    pub fn get_monthly_revenue(&self) -> Result<MonthlyRevenueSeries, AnalyticsError> {
        Ok(self.snapshot()?.monthly_revenue.clone())
    }

    pub fn get_monthly_cancellation_rate(&self) -> Result<MonthlySeries, AnalyticsError> {
        Ok(self.snapshot()?.metrics.monthly_cancellation_rate.clone())
    }

    /// The published forecast, or the reason the current snapshot has none.
    pub fn get_forecast(&self) -> Result<ForecastResult, AnalyticsError> {
        self.snapshot()?.forecast.clone().map_err(AnalyticsError::from)
    }

    /// Publish a new dataset from raw CSV bytes.
    ///
    /// On failure the previous snapshot stays active.
    pub fn replace_dataset(&self, raw_bytes: &[u8]) -> Result<DatasetVersion, PublishError> {
        self.publisher
            .publish(raw_bytes)
            .map(|snapshot| snapshot.version.clone())
    }

    /// Load the working dataset file configured for this service.
    pub fn load_working_file(&self) -> Result<DatasetVersion, PublishError> {
        self.publisher
            .load_working_file()
            .map(|snapshot| snapshot.version.clone())
    }

    /// Answer a question about the current analytics.
    pub async fn ask(&self, question: &str) -> Result<String, AskError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AskError::EmptyQuestion);
        }
        if question.chars().count() > MAX_QUESTION_CHARS {
            return Err(AskError::QuestionTooLong {
                max: MAX_QUESTION_CHARS,
            });
        }

        let snapshot = self.publisher.current().ok_or(AskError::NotReady)?;
        let prompt = build_prompt(&snapshot.metrics, &snapshot.monthly_revenue, question);
        drop(snapshot);

        let answer = self.generator.answer(&prompt).await?;
        info!(
            generator = self.generator.name(),
            question_len = question.len(),
            answer_len = answer.len(),
            "Question answered"
        );
        Ok(answer)
    }
}

#[cfg(test)]
#[path = "analytics_tests.rs"]
mod analytics_tests;
