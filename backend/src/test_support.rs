//! Builders shared by unit tests.

use chrono::NaiveDate;

use crate::models::{BookingRecord, Dataset};

pub(crate) struct BookingBuilder {
    record: BookingRecord,
}

/// Booking with a one-night stay at rate 0 on the given `YYYY-MM-DD` date.
pub(crate) fn booking(reservation_status_date: &str) -> BookingBuilder {
    let date = NaiveDate::parse_from_str(reservation_status_date, "%Y-%m-%d")
        .expect("test date must be YYYY-MM-DD");
    BookingBuilder {
        record: BookingRecord {
            hotel: "City Hotel".to_string(),
            arrival_date_year: 2015,
            arrival_date_month: "July".to_string(),
            arrival_date_day_of_month: 1,
            lead_time: 0,
            stays_in_weekend_nights: 0,
            stays_in_week_nights: 1,
            adr: 0.0,
            is_canceled: false,
            country: "PRT".to_string(),
            reservation_status_date: date,
        },
    }
}

impl BookingBuilder {
    pub(crate) fn adr(mut self, adr: f64) -> Self {
        self.record.adr = adr;
        self
    }

    pub(crate) fn nights(mut self, week: u32, weekend: u32) -> Self {
        self.record.stays_in_week_nights = week;
        self.record.stays_in_weekend_nights = weekend;
        self
    }

    pub(crate) fn canceled(mut self) -> Self {
        self.record.is_canceled = true;
        self
    }

    pub(crate) fn country(mut self, country: &str) -> Self {
        self.record.country = country.to_string();
        self
    }

    pub(crate) fn lead_time(mut self, days: u32) -> Self {
        self.record.lead_time = days;
        self
    }

    pub(crate) fn build(self) -> BookingRecord {
        self.record
    }
}

pub(crate) fn dataset(bookings: Vec<BookingBuilder>) -> Dataset {
    bookings.into_iter().map(BookingBuilder::build).collect()
}

