use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::error::{DataLoadError, LoadResult};
use crate::models::{BookingRecord, Dataset};

/// Cell values treated as missing, in addition to the empty string.
const MISSING_MARKERS: [&str; 7] = ["NA", "N/A", "NULL", "null", "NaN", "nan", "None"];

/// Date formats accepted for `reservation_status_date`.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Column order used when writing a dataset back to CSV.
pub const CANONICAL_COLUMNS: [&str; 11] = [
    "hotel",
    "is_canceled",
    "lead_time",
    "arrival_date_year",
    "arrival_date_month",
    "arrival_date_day_of_month",
    "stays_in_weekend_nights",
    "stays_in_week_nights",
    "country",
    "adr",
    "reservation_status_date",
];

/// Header positions of the columns the loader reads.
struct ColumnIndex {
    adr: usize,
    week_nights: usize,
    weekend_nights: usize,
    is_canceled: usize,
    country: usize,
    lead_time: usize,
    reservation_status_date: usize,
    hotel: Option<usize>,
    arrival_year: Option<usize>,
    arrival_month: Option<usize>,
    arrival_day: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> LoadResult<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let find = |name: &str| names.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(DataLoadError::MissingColumn(name));

        Ok(Self {
            adr: require("adr")?,
            week_nights: require("stays_in_week_nights")?,
            weekend_nights: require("stays_in_weekend_nights")?,
            is_canceled: require("is_canceled")?,
            country: require("country")?,
            lead_time: require("lead_time")?,
            reservation_status_date: require("reservation_status_date")?,
            hotel: find("hotel"),
            arrival_year: find("arrival_date_year"),
            arrival_month: find("arrival_date_month"),
            arrival_day: find("arrival_date_day_of_month"),
        })
    }
}

/// Parse a bookings CSV file into a [`Dataset`].
pub fn parse_bookings_csv(path: &Path) -> LoadResult<Dataset> {
    let file = File::open(path)?;
    parse_bookings_reader(BufReader::new(file))
}

/// Parse an in-memory CSV payload (e.g. an upload body).
pub fn parse_bookings_bytes(bytes: &[u8]) -> LoadResult<Dataset> {
    parse_bookings_reader(bytes)
}

/// Parse bookings from any reader. The first row must be a header.
pub fn parse_bookings_reader<R: Read>(reader: R) -> LoadResult<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = result?;
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);
        records.push(parse_record(&row, &columns, line)?);
    }

    Ok(Dataset::from_records(records))
}

fn parse_record(row: &StringRecord, columns: &ColumnIndex, line: u64) -> LoadResult<BookingRecord> {
    let date_raw = cell(row, Some(columns.reservation_status_date));
    let reservation_status_date = date_raw
        .and_then(parse_reservation_date)
        .ok_or_else(|| DataLoadError::InvalidDate {
            line,
            value: date_raw.unwrap_or_default().to_string(),
        })?;

    Ok(BookingRecord {
        hotel: text(row, columns.hotel),
        arrival_date_year: parse_year(row, columns.arrival_year, line)?,
        arrival_date_month: text(row, columns.arrival_month),
        arrival_date_day_of_month: parse_count(
            row,
            columns.arrival_day,
            "arrival_date_day_of_month",
            line,
        )?,
        lead_time: parse_count(row, Some(columns.lead_time), "lead_time", line)?,
        stays_in_weekend_nights: parse_count(
            row,
            Some(columns.weekend_nights),
            "stays_in_weekend_nights",
            line,
        )?,
        stays_in_week_nights: parse_count(
            row,
            Some(columns.week_nights),
            "stays_in_week_nights",
            line,
        )?,
        adr: parse_amount(row, Some(columns.adr), "adr", line)?,
        is_canceled: parse_flag(row, Some(columns.is_canceled), "is_canceled", line)?,
        country: text(row, Some(columns.country)),
        reservation_status_date,
    })
}

/// Non-missing cell content, `None` for absent columns and missing markers.
fn cell(row: &StringRecord, index: Option<usize>) -> Option<&str> {
    let value = row.get(index?)?;
    if value.is_empty() || MISSING_MARKERS.contains(&value) {
        None
    } else {
        Some(value)
    }
}

fn text(row: &StringRecord, index: Option<usize>) -> String {
    cell(row, index).unwrap_or_default().to_string()
}

fn invalid(line: u64, column: &'static str, value: &str) -> DataLoadError {
    DataLoadError::InvalidValue {
        line,
        column,
        value: value.to_string(),
    }
}

fn parse_amount(
    row: &StringRecord,
    index: Option<usize>,
    column: &'static str,
    line: u64,
) -> LoadResult<f64> {
    match cell(row, index) {
        None => Ok(0.0),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(line, column, raw)),
    }
}

/// Non-negative whole number; tolerates a trailing `.0` written by spreadsheets.
fn parse_count(
    row: &StringRecord,
    index: Option<usize>,
    column: &'static str,
    line: u64,
) -> LoadResult<u32> {
    match cell(row, index) {
        None => Ok(0),
        Some(raw) => {
            if let Ok(value) = raw.parse::<u32>() {
                return Ok(value);
            }
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= f64::from(u32::MAX))
                .map(|v| v as u32)
                .ok_or_else(|| invalid(line, column, raw))
        }
    }
}

fn parse_year(row: &StringRecord, index: Option<usize>, line: u64) -> LoadResult<i32> {
    let year = parse_count(row, index, "arrival_date_year", line)?;
    i32::try_from(year).map_err(|_| invalid(line, "arrival_date_year", &year.to_string()))
}

fn parse_flag(
    row: &StringRecord,
    index: Option<usize>,
    column: &'static str,
    line: u64,
) -> LoadResult<bool> {
    match cell(row, index) {
        None => Ok(false),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "0" | "0.0" | "false" => Ok(false),
            "1" | "1.0" | "true" => Ok(true),
            _ => Err(invalid(line, column, raw)),
        },
    }
}

/// Parse a reservation status date in any of the accepted formats.
pub fn parse_reservation_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Serialize a dataset back to CSV using [`CANONICAL_COLUMNS`].
///
/// Parsing the output yields records equal to the input.
pub fn write_bookings_csv(dataset: &Dataset) -> LoadResult<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CANONICAL_COLUMNS)?;

    for record in dataset.records() {
        writer.write_record([
            record.hotel.clone(),
            u8::from(record.is_canceled).to_string(),
            record.lead_time.to_string(),
            record.arrival_date_year.to_string(),
            record.arrival_date_month.clone(),
            record.arrival_date_day_of_month.to_string(),
            record.stays_in_weekend_nights.to_string(),
            record.stays_in_week_nights.to_string(),
            record.country.clone(),
            record.adr.to_string(),
            record.reservation_status_date.format("%Y-%m-%d").to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| DataLoadError::Io(e.into_error()))
}
