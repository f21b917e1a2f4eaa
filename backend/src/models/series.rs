use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::month::MonthKey;

/// Values keyed by calendar month, always iterated in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySeries(BTreeMap<MonthKey, f64>);

/// Summed `total_revenue` per month.
pub type MonthlyRevenueSeries = MonthlySeries;

impl MonthlySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the month's running total.
    pub fn accumulate(&mut self, month: MonthKey, value: f64) {
        *self.0.entry(month).or_insert(0.0) += value;
    }

    pub fn insert(&mut self, month: MonthKey, value: f64) {
        self.0.insert(month, value);
    }

    pub fn get(&self, month: &MonthKey) -> Option<f64> {
        self.0.get(month).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MonthKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.0.keys().copied()
    }

    pub fn first_month(&self) -> Option<MonthKey> {
        self.0.keys().next().copied()
    }

    pub fn last_month(&self) -> Option<MonthKey> {
        self.0.keys().next_back().copied()
    }

    /// Sum of all monthly values.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// `(month, value)` pairs in ascending month order.
    pub fn points(&self) -> Vec<(MonthKey, f64)> {
        self.iter().collect()
    }

    /// The last `n` months (fewer if the series is shorter), oldest first.
    pub fn tail(&self, n: usize) -> Vec<(MonthKey, f64)> {
        let skip = self.0.len().saturating_sub(n);
        self.iter().skip(skip).collect()
    }
}

impl FromIterator<(MonthKey, f64)> for MonthlySeries {
    fn from_iter<I: IntoIterator<Item = (MonthKey, f64)>>(iter: I) -> Self {
        let mut series = MonthlySeries::new();
        for (month, value) in iter {
            series.accumulate(month, value);
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_accumulate_sums_per_month() {
        let series: MonthlySeries = vec![
            (month("2023-02"), 50.0),
            (month("2023-01"), 100.0),
            (month("2023-02"), 150.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(&month("2023-01")), Some(100.0));
        assert_eq!(series.get(&month("2023-02")), Some(200.0));
        assert_eq!(series.total(), 300.0);
    }

    #[test]
    fn test_points_are_chronological() {
        let mut series = MonthlySeries::new();
        series.insert(month("2023-03"), 3.0);
        series.insert(month("2022-12"), 1.0);
        series.insert(month("2023-01"), 2.0);

        let months: Vec<String> = series.months().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2022-12", "2023-01", "2023-03"]);
        assert_eq!(series.first_month(), Some(month("2022-12")));
        assert_eq!(series.last_month(), Some(month("2023-03")));
    }

    #[test]
    fn test_tail() {
        let series: MonthlySeries = (1..=7)
            .map(|m| (MonthKey::new(2023, m).unwrap(), m as f64))
            .collect();

        let tail = series.tail(5);
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0], (month("2023-03"), 3.0));
        assert_eq!(tail[4], (month("2023-07"), 7.0));
        assert_eq!(series.tail(20).len(), 7);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut series = MonthlySeries::new();
        series.insert(month("2023-02"), 200.0);
        series.insert(month("2023-01"), 100.0);
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json, serde_json::json!({"2023-01": 100.0, "2023-02": 200.0}));
    }
}
