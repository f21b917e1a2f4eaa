#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Every configuration variable, cleared so the host environment cannot leak in.
pub const CONFIG_VARS: [&str; 12] = [
    "BOOKING_CONFIG",
    "HOST",
    "PORT",
    "MAX_UPLOAD_BYTES",
    "DATASET_PATH",
    "FORECAST_HORIZON",
    "MIN_HISTORY_POINTS",
    "REQUIRE_FORECAST",
    "GEMINI_API_KEY",
    "GOOGLE_API_KEY",
    "GEMINI_MODEL",
    "GEMINI_BASE_URL",
];

pub const HEADER: &str = "hotel,is_canceled,lead_time,arrival_date_year,arrival_date_month,arrival_date_day_of_month,stays_in_weekend_nights,stays_in_week_nights,adults,country,adr,reservation_status,reservation_status_date";

/// One CSV row in [`HEADER`] order.
pub struct Row {
    pub canceled: bool,
    pub lead_time: u32,
    pub weekend_nights: u32,
    pub week_nights: u32,
    pub country: &'static str,
    pub adr: f64,
    pub date: &'static str,
}

impl Row {
    pub fn new(date: &'static str, adr: f64) -> Self {
        Self {
            canceled: false,
            lead_time: 0,
            weekend_nights: 0,
            week_nights: 1,
            country: "PRT",
            adr,
            date,
        }
    }

    pub fn canceled(mut self) -> Self {
        self.canceled = true;
        self
    }

    pub fn country(mut self, country: &'static str) -> Self {
        self.country = country;
        self
    }

    pub fn lead_time(mut self, days: u32) -> Self {
        self.lead_time = days;
        self
    }

    pub fn nights(mut self, week: u32, weekend: u32) -> Self {
        self.week_nights = week;
        self.weekend_nights = weekend;
        self
    }

    fn to_csv(&self) -> String {
        format!(
            "City Hotel,{},{},2015,July,1,{},{},2,{},{},{},{}",
            u8::from(self.canceled),
            self.lead_time,
            self.weekend_nights,
            self.week_nights,
            self.country,
            self.adr,
            if self.canceled { "Canceled" } else { "Check-Out" },
            self.date
        )
    }
}

/// CSV document with [`HEADER`] and the given rows.
pub fn bookings_csv(rows: &[Row]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(&row.to_csv());
    }
    out.push('\n');
    out
}

/// The two-month scenario: 2023-01 earns 100, 2023-02 earns 200.
pub fn two_month_csv() -> String {
    bookings_csv(&[
        Row::new("2023-01-15", 100.0),
        Row::new("2023-02-03", 50.0).nights(2, 2).canceled().country("GBR"),
    ])
}

/// 78 bookings spread over 2015-07 .. 2017-08.
pub fn sample_dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("hotel_bookings_sample.csv")
}
