use chrono::{Datelike, Months, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Calendar month used to bucket bookings, displayed as `YYYY-MM`.
///
/// Internally anchored on the first day of the month so ordering is
/// chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// Create a month key from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Month containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Month `n` months after this one, `None` past chrono's date range.
    pub fn add_months(&self, n: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(n)).map(Self)
    }

    /// The following calendar month.
    pub fn succ(&self) -> Option<Self> {
        self.add_months(1)
    }

    /// Signed number of months from `origin` to `self`.
    pub fn months_since(&self, origin: MonthKey) -> i64 {
        let ordinal = |m: &MonthKey| i64::from(m.year()) * 12 + i64::from(m.month()) - 1;
        ordinal(self) - ordinal(&origin)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Error returned when a string is not a `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month key {0:?}, expected YYYY-MM")]
pub struct ParseMonthKeyError(pub String);

impl FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| ParseMonthKeyError(s.to_string()))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(ParseMonthKeyError(s.to_string()));
        }
        let year: i32 = year.parse().map_err(|_| ParseMonthKeyError(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| ParseMonthKeyError(s.to_string()))?;
        MonthKey::new(year, month).ok_or_else(|| ParseMonthKeyError(s.to_string()))
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        MonthKey::from_date(date)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[path = "month_tests.rs"]
mod month_tests;
