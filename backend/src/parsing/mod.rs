//! Parsers for the booking dataset.
//!
//! The loader reads a CSV with a header row, applies per-column fallbacks for
//! missing cells and computes the derived `total_revenue` and `month` columns.
//!
//! # Parsers
//!
//! - [`csv_parser`]: Parse and re-serialize hotel booking CSV files
//!
//! # Example
//!
//! ```no_run
//! use booking_analytics::parsing::csv_parser::parse_bookings_csv;
//! use std::path::Path;
//!
//! let dataset = parse_bookings_csv(Path::new("hotel_bookings.csv"))
//!     .expect("Failed to parse bookings");
//! println!("{} bookings", dataset.len());
//! ```

pub mod csv_parser;
pub mod error;


pub use csv_parser::{parse_bookings_bytes, parse_bookings_csv, write_bookings_csv};
pub use error::{DataLoadError, LoadResult};
