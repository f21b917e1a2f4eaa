use super::*;
use crate::models::MonthlySeries;

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn series(pairs: &[(&str, f64)]) -> MonthlySeries {
    pairs.iter().map(|(m, v)| (month(m), *v)).collect()
}

#[derive(Debug)]
struct ConstantForecaster(f64);

struct ConstantModel(f64);

impl FittedModel for ConstantModel {
    fn model(&self) -> &'static str {
        "constant"
    }

    fn predict(&mut self, horizon: usize) -> Result<Vec<f64>, ForecastError> {
        Ok(vec![self.0; horizon])
    }
}

/// Returns one prediction fewer than asked for.
#[derive(Debug)]
struct ShortForecaster;

struct ShortModel;

impl FittedModel for ShortModel {
    fn model(&self) -> &'static str {
        "short"
    }

    fn predict(&mut self, horizon: usize) -> Result<Vec<f64>, ForecastError> {
        Ok(vec![1.0; horizon.saturating_sub(1)])
    }
}

impl Forecaster for ShortForecaster {
    fn name(&self) -> &'static str {
        "short"
    }

    fn fit(&self, _history: &[(MonthKey, f64)]) -> Result<Box<dyn FittedModel>, ForecastError> {
        Ok(Box::new(ShortModel))
    }
}

impl Forecaster for ConstantForecaster {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn fit(&self, _history: &[(MonthKey, f64)]) -> Result<Box<dyn FittedModel>, ForecastError> {
        Ok(Box::new(ConstantModel(self.0)))
    }
}

#[test]
fn test_two_month_scenario() {
    let engine = ForecastEngine::default();
    let result = engine
        .fit_and_predict(&series(&[("2023-01", 100.0), ("2023-02", 200.0)]), DEFAULT_HORIZON)
        .unwrap();

    assert_eq!(result.horizon(), 12);
    assert_eq!(result.model, ets::DRIFT_MODEL);
    assert_eq!(result.first_month(), Some(month("2023-03")));
    assert_eq!(
        result.points[0].date,
        NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()
    );
    assert!((result.points[0].predicted_revenue - 300.0).abs() < 1e-9);
    assert_eq!(result.points[11].month, month("2024-02"));
}

#[test]
fn test_points_are_consecutive_months() {
    let engine = ForecastEngine::default();
    let result = engine
        .fit_and_predict(
            &series(&[("2022-10", 5.0), ("2022-11", 7.0), ("2022-12", 6.0)]),
            5,
        )
        .unwrap();

    let months: Vec<String> = result.points.iter().map(|p| p.month.to_string()).collect();
    assert_eq!(
        months,
        vec!["2023-01", "2023-02", "2023-03", "2023-04", "2023-05"]
    );
    for point in &result.points {
        assert_eq!(point.date, point.month.first_day());
    }
}

#[test]
fn test_single_month_is_insufficient() {
    let engine = ForecastEngine::default();
    let result = engine.fit_and_predict(&series(&[("2023-01", 100.0)]), DEFAULT_HORIZON);

    assert_eq!(
        result,
        Err(ForecastError::InsufficientHistory {
            required: 2,
            actual: 1
        })
    );
}

#[test]
fn test_empty_series_is_insufficient() {
    let engine = ForecastEngine::default();
    let result = engine.fit_and_predict(&MonthlySeries::new(), DEFAULT_HORIZON);
    assert!(matches!(
        result,
        Err(ForecastError::InsufficientHistory { actual: 0, .. })
    ));
}

#[test]
fn test_min_history_is_configurable() {
    let engine = ForecastEngine::new(Arc::new(EtsForecaster::default()), 4);
    let result = engine.fit_and_predict(
        &series(&[("2023-01", 1.0), ("2023-02", 2.0), ("2023-03", 3.0)]),
        3,
    );
    assert_eq!(
        result,
        Err(ForecastError::InsufficientHistory {
            required: 4,
            actual: 3
        })
    );
}

#[test]
fn test_zero_horizon_rejected() {
    let engine = ForecastEngine::default();
    let result = engine.fit_and_predict(&series(&[("2023-01", 1.0), ("2023-02", 2.0)]), 0);
    assert_eq!(result, Err(ForecastError::InvalidHorizon(0)));
}

#[test]
fn test_custom_forecaster_is_used() {
    let engine = ForecastEngine::new(Arc::new(ConstantForecaster(7.5)), 2);
    let result = engine
        .fit_and_predict(&series(&[("2023-01", 1.0), ("2023-02", 2.0)]), 3)
        .unwrap();

    assert_eq!(result.model, "constant");
    assert!(result.points.iter().all(|p| p.predicted_revenue == 7.5));
}

#[test]
fn test_non_finite_prediction_is_model_error() {
    let engine = ForecastEngine::new(Arc::new(ConstantForecaster(f64::INFINITY)), 2);
    let result = engine.fit_and_predict(&series(&[("2023-01", 1.0), ("2023-02", 2.0)]), 3);
    assert!(matches!(result, Err(ForecastError::Model(_))));
}

#[test]
fn test_short_prediction_is_model_error() {
    let engine = ForecastEngine::new(Arc::new(ShortForecaster), 2);
    let result = engine.fit_and_predict(&series(&[("2023-01", 1.0), ("2023-02", 2.0)]), 3);
    assert!(matches!(result, Err(ForecastError::Model(_))));
}

#[test]
fn test_sample_length_history_uses_mstl() {
    let origin = month("2015-07");
    let history: MonthlySeries = (0..26u32)
        .map(|i| {
            let seasonal = [3.0, 4.0, 2.0, 1.0, 0.5, 0.4, 0.3, 0.5, 1.0, 1.5, 2.0, 2.5][i as usize % 12];
            (origin.add_months(i).unwrap(), 10_000.0 * seasonal + 100.0 * f64::from(i))
        })
        .collect();

    let result = ForecastEngine::default()
        .fit_and_predict(&history, DEFAULT_HORIZON)
        .unwrap();

    assert_eq!(result.model, ets::MSTL_MODEL);
    assert_eq!(result.first_month(), Some(month("2017-09")));
    assert_eq!(result.horizon(), 12);
    assert!(result.points.iter().all(|p| p.predicted_revenue.is_finite()));
}

#[test]
fn test_forecast_is_deterministic() {
    let engine = ForecastEngine::default();
    let history = series(&[("2023-01", 100.0), ("2023-02", 250.0), ("2023-04", 180.0)]);

    let first = engine.fit_and_predict(&history, 6).unwrap();
    let second = engine.fit_and_predict(&history, 6).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_error_codes() {
    assert_eq!(
        ForecastError::InsufficientHistory {
            required: 2,
            actual: 1
        }
        .code(),
        "INSUFFICIENT_HISTORY"
    );
    assert_eq!(ForecastError::InvalidHorizon(0).code(), "INVALID_HORIZON");
}
