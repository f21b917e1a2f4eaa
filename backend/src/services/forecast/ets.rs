//! Monthly revenue forecasting with `augurs`.
//!
//! The observed months are laid out on a dense monthly grid (missing months
//! become NaN and are filled by linear interpolation). The model is chosen
//! by how much of that grid is covered:
//!
//! - at least two full years: MSTL with a 12-month period and an AutoETS trend
//! - at least one year: non-seasonal AutoETS
//! - anything shorter: a drift line through the first and last observation

use augurs::{
    ets::AutoETS,
    forecaster::{transforms::LinearInterpolator, Forecaster as AugursForecaster, Transformer},
    mstl::MSTLModel,
    Fit,
};

use super::{FittedModel, ForecastError, Forecaster};
use crate::models::MonthKey;

/// Seasonal period of monthly data.
const YEARLY_PERIOD: usize = 12;

/// Minimum grid length before the yearly component is decomposed.
pub const SEASONAL_MIN_SPAN: usize = 2 * YEARLY_PERIOD;

/// Minimum grid length before ETS is fitted instead of the drift line.
pub const ETS_MIN_SPAN: usize = YEARLY_PERIOD;

pub const MSTL_MODEL: &str = "mstl_auto_ets";
pub const ETS_MODEL: &str = "auto_ets";
pub const DRIFT_MODEL: &str = "drift";

/// Default [`Forecaster`]: MSTL/AutoETS when the history allows, drift otherwise.
#[derive(Debug, Clone, Copy)]
pub struct EtsForecaster {
    seasonal: bool,
}

impl Default for EtsForecaster {
    fn default() -> Self {
        Self { seasonal: true }
    }
}

impl EtsForecaster {
    /// Never decomposes a yearly component, whatever the history length.
    pub fn non_seasonal() -> Self {
        Self { seasonal: false }
    }
}

impl Forecaster for EtsForecaster {
    fn name(&self) -> &'static str {
        if self.seasonal {
            MSTL_MODEL
        } else {
            ETS_MODEL
        }
    }

    fn fit(&self, history: &[(MonthKey, f64)]) -> Result<Box<dyn FittedModel>, ForecastError> {
        let values = dense_monthly_values(history)?;

        if self.seasonal && values.len() >= SEASONAL_MIN_SPAN {
            let trend = AutoETS::non_seasonal().into_trend_model();
            let mstl = MSTLModel::new(vec![YEARLY_PERIOD], trend);
            return fit_with(mstl, &values, MSTL_MODEL);
        }
        if values.len() >= ETS_MIN_SPAN {
            return fit_with(AutoETS::non_seasonal(), &values, ETS_MODEL);
        }
        Ok(Box::new(Drift::fit(&values)?))
    }
}

/// Values from the first to the last observed month, NaN where a month is missing.
fn dense_monthly_values(history: &[(MonthKey, f64)]) -> Result<Vec<f64>, ForecastError> {
    let (first, last) = match (history.first(), history.last()) {
        (Some((first, _)), Some((last, _))) => (*first, *last),
        _ => return Err(ForecastError::Model("cannot fit an empty history".to_string())),
    };

    let span = last.months_since(first);
    if span < 0 {
        return Err(ForecastError::Model(format!(
            "history is not chronological: {} after {}",
            first, last
        )));
    }

    let mut values = vec![f64::NAN; span as usize + 1];
    for (month, value) in history {
        if !value.is_finite() {
            return Err(ForecastError::Model(format!(
                "non-finite revenue for {}",
                month
            )));
        }
        let offset = month.months_since(first);
        if offset < 0 || offset > span {
            return Err(ForecastError::Model(format!(
                "month {} lies outside {}..={}",
                month, first, last
            )));
        }
        values[offset as usize] = *value;
    }
    Ok(values)
}

fn fit_with<M>(
    model: M,
    values: &[f64],
    name: &'static str,
) -> Result<Box<dyn FittedModel>, ForecastError>
where
    M: Fit + 'static,
    M::Fitted: 'static,
{
    let transformers: Vec<Box<dyn Transformer>> = vec![Box::new(LinearInterpolator::default())];
    let mut forecaster = AugursForecaster::new(model).with_transformers(transformers);
    forecaster
        .fit(values)
        .map_err(|e| ForecastError::Model(format!("{} fit error: {}", name, e)))?;

    Ok(Box::new(FittedAugurs { name, forecaster }))
}

struct FittedAugurs<M: Fit> {
    name: &'static str,
    forecaster: AugursForecaster<M>,
}

impl<M: Fit> FittedModel for FittedAugurs<M> {
    fn model(&self) -> &'static str {
        self.name
    }

    fn predict(&mut self, horizon: usize) -> Result<Vec<f64>, ForecastError> {
        let forecast = self
            .forecaster
            .predict(horizon, None::<f64>)
            .map_err(|e| ForecastError::Model(format!("{} predict error: {}", self.name, e)))?;
        Ok(forecast.point)
    }
}

/// Straight line through the first and last observation; flat for a single point.
#[derive(Debug, Clone, Copy)]
struct Drift {
    last: f64,
    slope: f64,
}

impl Drift {
    fn fit(values: &[f64]) -> Result<Self, ForecastError> {
        match (values.first(), values.last()) {
            (Some(&first), Some(&last)) => {
                let steps = values.len() - 1;
                let slope = if steps == 0 {
                    0.0
                } else {
                    (last - first) / steps as f64
                };
                Ok(Self { last, slope })
            }
            _ => Err(ForecastError::Model("cannot fit an empty history".to_string())),
        }
    }
}

impl FittedModel for Drift {
    fn model(&self) -> &'static str {
        DRIFT_MODEL
    }

    fn predict(&mut self, horizon: usize) -> Result<Vec<f64>, ForecastError> {
        Ok((1..=horizon)
            .map(|step| self.last + self.slope * step as f64)
            .collect())
    }
}
