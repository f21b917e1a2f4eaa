//! Atomically published analytics snapshots.
//!
//! Every accepted dataset produces one immutable [`AnalyticsSnapshot`]. The
//! publisher parses the raw bytes, computes metrics and the forecast, persists
//! the bytes to the working file and only then swaps the shared pointer, so a
//! reader always sees either the previous snapshot or the complete new one.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::models::{Dataset, MonthlyRevenueSeries};
use crate::parsing::{parse_bookings_bytes, write_bookings_csv, DataLoadError};
use crate::services::forecast::{ForecastEngine, ForecastError, ForecastResult, DEFAULT_HORIZON};
use crate::services::metrics::{self, EmptyDatasetError, Metrics};
use crate::store::{calculate_checksum, DatasetStore};

/// Identity of a published dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetVersion {
    /// Starts at 1 and increases by one per published snapshot.
    pub sequence: u64,
    /// SHA-256 of the source bytes.
    pub checksum: String,
    pub rows: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Everything derived from one dataset.
#[derive(Debug)]
pub struct AnalyticsSnapshot {
    pub version: DatasetVersion,
    pub dataset: Arc<Dataset>,
    pub monthly_revenue: MonthlyRevenueSeries,
    pub metrics: Metrics,
    /// The forecast, or why there is none when forecasts are not required.
    pub forecast: Result<ForecastResult, ForecastError>,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    Load(#[from] DataLoadError),

    #[error(transparent)]
    Empty(#[from] EmptyDatasetError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("Failed to persist working dataset: {0}")]
    Persist(#[source] io::Error),

    #[error("No working dataset file configured")]
    NoWorkingFile,
}

impl PublishError {
    pub fn code(&self) -> &'static str {
        match self {
            PublishError::Load(e) => e.code(),
            PublishError::Empty(_) => "EMPTY_DATASET",
            PublishError::Forecast(e) => e.code(),
            PublishError::Persist(_) => "PERSIST_FAILED",
            PublishError::NoWorkingFile => "NO_WORKING_FILE",
        }
    }
}

/// Forecast settings applied on every publish.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub engine: ForecastEngine,
    pub horizon: usize,
    /// Fail the publish when no forecast can be produced.
    pub require_forecast: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            engine: ForecastEngine::default(),
            horizon: DEFAULT_HORIZON,
            require_forecast: true,
        }
    }
}

/// Owns the current snapshot and serializes the publishes that replace it.
pub struct SnapshotPublisher {
    current: RwLock<Option<Arc<AnalyticsSnapshot>>>,
    /// Sequence of the last published snapshot; held for a whole publish.
    sequence: Mutex<u64>,
    options: PublishOptions,
    store: Option<DatasetStore>,
}

impl SnapshotPublisher {
    pub fn new(options: PublishOptions, store: Option<DatasetStore>) -> Self {
        Self {
            current: RwLock::new(None),
            sequence: Mutex::new(0),
            options,
            store,
        }
    }

    pub fn options(&self) -> &PublishOptions {
        &self.options
    }

    pub fn store(&self) -> Option<&DatasetStore> {
        self.store.as_ref()
    }

    /// The latest published snapshot, if any.
    pub fn current(&self) -> Option<Arc<AnalyticsSnapshot>> {
        self.current.read().clone()
    }

    /// Publish an uploaded dataset and write it to the working file.
    pub fn publish(&self, bytes: &[u8]) -> Result<Arc<AnalyticsSnapshot>, PublishError> {
        self.publish_bytes(bytes, true)
    }

    /// Load the working file and publish it.
    pub fn load_working_file(&self) -> Result<Arc<AnalyticsSnapshot>, PublishError> {
        let store = self.store.as_ref().ok_or(PublishError::NoWorkingFile)?;
        let bytes = store.read().map_err(DataLoadError::from)?;
        info!(path = %store.path().display(), bytes = bytes.len(), "Loading working dataset");
        self.publish_bytes(&bytes, false)
    }

    /// Publish an already parsed dataset without touching the working file.
    ///
    /// The checksum is taken over the dataset's canonical CSV form.
    pub fn publish_dataset(&self, dataset: Dataset) -> Result<Arc<AnalyticsSnapshot>, PublishError> {
        let mut sequence = self.sequence.lock();
        let canonical = write_bookings_csv(&dataset)?;
        let snapshot = self.build(dataset, calculate_checksum(&canonical), *sequence + 1)?;
        Ok(self.swap(&mut sequence, snapshot))
    }

    fn publish_bytes(
        &self,
        bytes: &[u8],
        persist: bool,
    ) -> Result<Arc<AnalyticsSnapshot>, PublishError> {
        let mut sequence = self.sequence.lock();
        let started = Instant::now();

        let dataset = parse_bookings_bytes(bytes)?;
        debug!(rows = dataset.len(), elapsed_ms = started.elapsed().as_millis() as u64, "Dataset parsed");

        let snapshot = self.build(dataset, calculate_checksum(bytes), *sequence + 1)?;

        if persist {
            if let Some(store) = &self.store {
                store.persist(bytes).map_err(PublishError::Persist)?;
            }
        }

        let snapshot = self.swap(&mut sequence, snapshot);
        info!(
            version = snapshot.version.sequence,
            rows = snapshot.version.rows,
            months = snapshot.monthly_revenue.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analytics snapshot published"
        );
        Ok(snapshot)
    }

    fn build(
        &self,
        dataset: Dataset,
        checksum: String,
        sequence: u64,
    ) -> Result<AnalyticsSnapshot, PublishError> {
        let (metrics, monthly_revenue) = metrics::compute_with_revenue(&dataset)?;

        let forecast = self
            .options
            .engine
            .fit_and_predict(&monthly_revenue, self.options.horizon);
        if let Err(e) = &forecast {
            if self.options.require_forecast {
                return Err(e.clone().into());
            }
            warn!(error = %e, "Publishing snapshot without a forecast");
        }

        Ok(AnalyticsSnapshot {
            version: DatasetVersion {
                sequence,
                checksum,
                rows: dataset.len(),
                loaded_at: Utc::now(),
            },
            dataset: Arc::new(dataset),
            monthly_revenue,
            metrics,
            forecast,
        })
    }

    fn swap(&self, sequence: &mut u64, snapshot: AnalyticsSnapshot) -> Arc<AnalyticsSnapshot> {
        *sequence = snapshot.version.sequence;
        let snapshot = Arc::new(snapshot);
        *self.current.write() = Some(Arc::clone(&snapshot));
        snapshot
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod snapshot_tests;
