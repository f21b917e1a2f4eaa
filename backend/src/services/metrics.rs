use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

use crate::models::{Dataset, MonthKey, MonthlyRevenueSeries, MonthlySeries};

/// Number of countries reported in [`Metrics::top_countries`].
pub const TOP_COUNTRY_LIMIT: usize = 10;

/// The dataset has no rows, so descriptive statistics are undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Dataset contains no bookings")]
pub struct EmptyDatasetError;

/// Descriptive statistics over `lead_time`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadTimeStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two bookings.
    pub std: Option<f64>,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

/// Booking count for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub bookings: usize,
}

/// Countries ordered by booking count, serialized as an ordered JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopCountries(Vec<CountryCount>);

impl TopCountries {
    pub fn entries(&self) -> &[CountryCount] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryCount> {
        self.0.iter()
    }
}

impl Serialize for TopCountries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.country, &entry.bookings)?;
        }
        map.end()
    }
}

/// Summary analytics for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_bookings: usize,
    pub total_revenue: f64,
    /// Percentage of canceled bookings in `[0, 100]`, unrounded.
    pub cancellation_rate: f64,
    pub top_countries: TopCountries,
    pub lead_time_stats: LeadTimeStats,
    /// Percentage of canceled bookings per reservation status month.
    pub monthly_cancellation_rate: MonthlySeries,
}

/// Compute the dataset metrics.
pub fn compute(dataset: &Dataset) -> Result<Metrics, EmptyDatasetError> {
    compute_with_revenue(dataset).map(|(metrics, _)| metrics)
}

/// Compute the metrics and the monthly revenue series in a single pass.
pub fn compute_with_revenue(
    dataset: &Dataset,
) -> Result<(Metrics, MonthlyRevenueSeries), EmptyDatasetError> {
    if dataset.is_empty() {
        return Err(EmptyDatasetError);
    }

    let mut canceled = 0usize;
    let mut total_revenue = 0.0;
    let mut lead_times = Vec::with_capacity(dataset.len());
    let mut monthly_revenue = MonthlySeries::new();
    // (bookings, canceled) per month
    let mut monthly_status: BTreeMap<MonthKey, (usize, usize)> = BTreeMap::new();
    // first-seen order is the Vec position
    let mut country_slots: HashMap<&str, usize> = HashMap::new();
    let mut country_counts: Vec<CountryCount> = Vec::new();

    for row in dataset.iter() {
        let record = row.record();

        total_revenue += row.total_revenue();
        monthly_revenue.accumulate(row.month(), row.total_revenue());
        lead_times.push(f64::from(record.lead_time));

        let status = monthly_status.entry(row.month()).or_insert((0, 0));
        status.0 += 1;
        if record.is_canceled {
            canceled += 1;
            status.1 += 1;
        }

        match country_slots.get(record.country.as_str()) {
            Some(&slot) => country_counts[slot].bookings += 1,
            None => {
                country_slots.insert(record.country.as_str(), country_counts.len());
                country_counts.push(CountryCount {
                    country: record.country.clone(),
                    bookings: 1,
                });
            }
        }
    }

    let total_bookings = dataset.len();
    let cancellation_rate = percentage(canceled, total_bookings);

    let monthly_cancellation_rate = monthly_status
        .into_iter()
        .map(|(month, (bookings, canceled))| (month, percentage(canceled, bookings)))
        .collect();

    let metrics = Metrics {
        total_bookings,
        total_revenue,
        cancellation_rate,
        top_countries: rank_countries(country_counts),
        lead_time_stats: compute_lead_time_stats(&lead_times)?,
        monthly_cancellation_rate,
    };

    Ok((metrics, monthly_revenue))
}

/// Group-by-month revenue sum on its own.
pub fn compute_monthly_revenue(dataset: &Dataset) -> MonthlyRevenueSeries {
    dataset
        .iter()
        .map(|row| (row.month(), row.total_revenue()))
        .collect()
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Sort by count descending; the stable sort keeps first-seen order on ties.
fn rank_countries(mut counts: Vec<CountryCount>) -> TopCountries {
    counts.sort_by(|a, b| b.bookings.cmp(&a.bookings));
    counts.truncate(TOP_COUNTRY_LIMIT);
    TopCountries(counts)
}

/// Compute count, mean, sample standard deviation, quartiles, min and max.
pub fn compute_lead_time_stats(values: &[f64]) -> Result<LeadTimeStats, EmptyDatasetError> {
    if values.is_empty() {
        return Err(EmptyDatasetError);
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Sample (n - 1) variance
    let std = if count > 1 {
        let variance = values
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (count - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };

    Ok(LeadTimeStats {
        count,
        mean,
        std,
        min: sorted[0],
        p25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        p75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod metrics_tests;
