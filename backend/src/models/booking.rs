// ============================================================================
// Booking records and the derived dataset
// ============================================================================
//
// A `BookingRecord` is one cleaned CSV row. `BookingRow` pairs it with the two
// derived columns; both are computed in `BookingRow::new` so they can never
// drift apart.

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};

use super::month::MonthKey;

/// One hotel booking with missing values already replaced by fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub hotel: String,
    pub arrival_date_year: i32,
    /// Month name as it appears in the source (e.g. `July`).
    pub arrival_date_month: String,
    pub arrival_date_day_of_month: u32,
    /// Days between booking and arrival.
    pub lead_time: u32,
    pub stays_in_weekend_nights: u32,
    pub stays_in_week_nights: u32,
    /// Average daily rate.
    pub adr: f64,
    pub is_canceled: bool,
    pub country: String,
    pub reservation_status_date: NaiveDate,
}

impl BookingRecord {
    pub fn total_nights(&self) -> u32 {
        self.stays_in_week_nights
            .saturating_add(self.stays_in_weekend_nights)
    }

    /// Arrival date assembled from the three arrival columns, if they form a
    /// valid calendar date.
    pub fn arrival_date(&self) -> Option<NaiveDate> {
        let month = self.arrival_date_month.trim().parse::<Month>().ok()?;
        NaiveDate::from_ymd_opt(
            self.arrival_date_year,
            month.number_from_month(),
            self.arrival_date_day_of_month,
        )
    }
}

/// A booking together with its derived columns.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRow {
    record: BookingRecord,
    total_revenue: f64,
    month: MonthKey,
}

impl BookingRow {
    pub fn new(record: BookingRecord) -> Self {
        let total_revenue = record.adr * f64::from(record.total_nights());
        let month = MonthKey::from_date(record.reservation_status_date);
        Self {
            record,
            total_revenue,
            month,
        }
    }

    pub fn record(&self) -> &BookingRecord {
        &self.record
    }

    /// `adr * (week nights + weekend nights)`.
    pub fn total_revenue(&self) -> f64 {
        self.total_revenue
    }

    /// Month of the reservation status date.
    pub fn month(&self) -> MonthKey {
        self.month
    }
}

/// Ordered, immutable collection of cleaned bookings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<BookingRow>,
}

impl Dataset {
    pub fn from_records(records: Vec<BookingRecord>) -> Self {
        Self {
            rows: records.into_iter().map(BookingRow::new).collect(),
        }
    }

    pub fn rows(&self) -> &[BookingRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookingRow> {
        self.rows.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &BookingRecord> {
        self.rows.iter().map(BookingRow::record)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the derived `total_revenue` column.
    pub fn total_revenue(&self) -> f64 {
        self.rows.iter().map(BookingRow::total_revenue).sum()
    }
}

impl FromIterator<BookingRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = BookingRecord>>(iter: I) -> Self {
        Dataset::from_records(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(adr: f64, week: u32, weekend: u32, date: (i32, u32, u32)) -> BookingRecord {
        BookingRecord {
            hotel: "Resort Hotel".to_string(),
            arrival_date_year: 2015,
            arrival_date_month: "July".to_string(),
            arrival_date_day_of_month: 1,
            lead_time: 10,
            stays_in_weekend_nights: weekend,
            stays_in_week_nights: week,
            adr,
            is_canceled: false,
            country: "PRT".to_string(),
            reservation_status_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
    }

    #[test]
    fn test_derived_columns() {
        let row = BookingRow::new(record(75.5, 3, 2, (2015, 7, 19)));
        assert_eq!(row.total_revenue(), 377.5);
        assert_eq!(row.month().to_string(), "2015-07");
    }

    #[test]
    fn test_zero_nights_yield_zero_revenue() {
        let row = BookingRow::new(record(120.0, 0, 0, (2016, 1, 3)));
        assert_eq!(row.total_revenue(), 0.0);
    }

    #[test]
    fn test_arrival_date() {
        let rec = record(1.0, 1, 0, (2015, 7, 1));
        assert_eq!(
            rec.arrival_date(),
            Some(NaiveDate::from_ymd_opt(2015, 7, 1).unwrap())
        );

        let mut bad = rec.clone();
        bad.arrival_date_month = String::new();
        assert_eq!(bad.arrival_date(), None);

        let mut feb = rec;
        feb.arrival_date_month = "February".to_string();
        feb.arrival_date_day_of_month = 30;
        assert_eq!(feb.arrival_date(), None);
    }

    #[test]
    fn test_dataset_total_revenue() {
        let dataset: Dataset = vec![
            record(100.0, 1, 0, (2023, 1, 5)),
            record(50.0, 2, 2, (2023, 2, 5)),
        ]
        .into_iter()
        .collect();

        assert_eq!(dataset.len(), 2);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.total_revenue(), 300.0);
    }
}
