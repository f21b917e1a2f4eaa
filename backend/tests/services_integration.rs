use std::fs;
use std::sync::Arc;

use booking_analytics::assistant::DisabledGenerator;
use booking_analytics::config::AppConfig;
use booking_analytics::parsing::{parse_bookings_csv, write_bookings_csv};
use booking_analytics::services::forecast::ForecastError;
use booking_analytics::services::metrics;
use booking_analytics::services::{AnalyticsError, AnalyticsService, PublishError};
use tempfile::tempdir;

mod support;
use support::{bookings_csv, sample_dataset_path, two_month_csv, Row};

fn service_for(path: std::path::PathBuf) -> AnalyticsService {
    let mut config = AppConfig::default();
    config.dataset.path = path;
    AnalyticsService::from_config(&config, Arc::new(DisabledGenerator))
}

#[test]
fn test_sample_dataset_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hotel_bookings.csv");
    fs::copy(sample_dataset_path(), &path).unwrap();

    let service = service_for(path);
    let version = service.load_working_file().unwrap();
    assert_eq!(version.sequence, 1);
    assert_eq!(version.rows, 78);

    let metrics = service.get_metrics_snapshot().unwrap();
    assert_eq!(metrics.total_bookings, 78);
    assert!(metrics.cancellation_rate >= 0.0 && metrics.cancellation_rate <= 100.0);
    assert!(metrics.top_countries.len() <= 10);
    assert_eq!(metrics.lead_time_stats.count, 78);

    let revenue = service.get_monthly_revenue().unwrap();
    assert_eq!(revenue.len(), 26);
    assert_eq!(revenue.first_month().unwrap().to_string(), "2015-07");
    assert_eq!(revenue.last_month().unwrap().to_string(), "2017-08");
    assert!((revenue.total() - metrics.total_revenue).abs() < 1e-6);

    let forecast = service.get_forecast().unwrap();
    assert_eq!(forecast.model, "mstl_auto_ets");
    assert_eq!(forecast.horizon(), 12);
    assert_eq!(forecast.first_month().unwrap().to_string(), "2017-09");
    for pair in forecast.points.windows(2) {
        assert_eq!(pair[0].month.succ(), Some(pair[1].month));
    }
}

#[test]
fn test_replace_dataset_overwrites_working_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hotel_bookings.csv");
    let service = service_for(path.clone());

    let csv = two_month_csv();
    let version = service.replace_dataset(csv.as_bytes()).unwrap();
    assert_eq!(version.sequence, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), csv);

    let revenue = service.get_monthly_revenue().unwrap();
    let pairs: Vec<(String, f64)> = revenue.iter().map(|(m, v)| (m.to_string(), v)).collect();
    assert_eq!(
        pairs,
        vec![("2023-01".to_string(), 100.0), ("2023-02".to_string(), 200.0)]
    );

    // A restarted service serves the accepted upload.
    let restarted = service_for(path);
    let reloaded = restarted.load_working_file().unwrap();
    assert_eq!(reloaded.checksum, version.checksum);
    assert_eq!(
        restarted.get_metrics_snapshot().unwrap(),
        service.get_metrics_snapshot().unwrap()
    );
}

#[test]
fn test_rejected_upload_leaves_everything_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hotel_bookings.csv");
    let service = service_for(path.clone());
    let csv = two_month_csv();
    service.replace_dataset(csv.as_bytes()).unwrap();

    let empty = bookings_csv(&[]);
    assert!(matches!(
        service.replace_dataset(empty.as_bytes()),
        Err(PublishError::Empty(_))
    ));

    let one_month = bookings_csv(&[Row::new("2023-05-01", 10.0)]);
    assert!(matches!(
        service.replace_dataset(one_month.as_bytes()),
        Err(PublishError::Forecast(ForecastError::InsufficientHistory { .. }))
    ));

    assert!(matches!(
        service.replace_dataset(b"not,a,booking,file\n1,2,3,4\n"),
        Err(PublishError::Load(_))
    ));

    assert_eq!(service.dataset_version().unwrap().sequence, 1);
    assert_eq!(service.get_metrics_snapshot().unwrap().total_bookings, 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), csv);
}

#[test]
fn test_lenient_forecast_publishes_single_month() {
    let dir = tempdir().unwrap();
    let mut config = AppConfig::default();
    config.dataset.path = dir.path().join("bookings.csv");
    config.forecast.require_forecast = false;
    let service = AnalyticsService::from_config(&config, Arc::new(DisabledGenerator));

    let csv = bookings_csv(&[Row::new("2023-05-01", 10.0).canceled()]);
    service.replace_dataset(csv.as_bytes()).unwrap();

    assert_eq!(service.get_metrics_snapshot().unwrap().cancellation_rate, 100.0);
    assert_eq!(
        service.get_forecast(),
        Err(AnalyticsError::Forecast(ForecastError::InsufficientHistory {
            required: 2,
            actual: 1
        }))
    );
}

#[test]
fn test_reserialized_sample_yields_identical_metrics() {
    let dataset = parse_bookings_csv(&sample_dataset_path()).unwrap();
    let rewritten = write_bookings_csv(&dataset).unwrap();

    let first = AnalyticsService::in_memory();
    first
        .replace_dataset(&fs::read(sample_dataset_path()).unwrap())
        .unwrap();
    let second = AnalyticsService::in_memory();
    second.replace_dataset(&rewritten).unwrap();

    assert_eq!(
        first.get_metrics_snapshot().unwrap(),
        second.get_metrics_snapshot().unwrap()
    );
    assert_eq!(first.get_forecast().unwrap(), second.get_forecast().unwrap());
}

#[test]
fn test_metrics_are_pure() {
    let dataset = parse_bookings_csv(&sample_dataset_path()).unwrap();
    let a = metrics::compute(&dataset).unwrap();
    let b = metrics::compute(&dataset).unwrap();
    assert_eq!(a, b);
}
