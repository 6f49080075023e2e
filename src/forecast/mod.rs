//! Price forecasting behind a single function boundary.
//!
//! The pipeline only ever sees [`Forecaster::forecast`]: a monthly series in,
//! twelve predicted months out (or nothing). Swap the implementation freely;
//! tests use stubs.

use crate::domain::{ForecastSeries, Granularity, SeriesPoint};

pub mod seasonal;

pub use seasonal::SeasonalTrendForecaster;

/// Number of months every forecast extends past the last observation.
pub const HORIZON_MONTHS: usize = 12;

pub trait Forecaster {
    /// Predict the [`HORIZON_MONTHS`] months following the last input period.
    ///
    /// Degenerate input (fewer than two distinct periods) or a failed fit
    /// yields `None`; implementations must not panic.
    fn forecast(&self, series: &[SeriesPoint]) -> Option<ForecastSeries>;
}

/// Forecast with the default model.
pub fn forecast(series: &[SeriesPoint]) -> Option<ForecastSeries> {
    SeasonalTrendForecaster::default().forecast(series)
}

/// Forecast only when the user opted in and the series is monthly.
pub fn forecast_if_enabled(
    forecaster: &dyn Forecaster,
    series: &[SeriesPoint],
    granularity: Granularity,
    enabled: bool,
) -> Option<ForecastSeries> {
    if !enabled || granularity != Granularity::Monthly {
        return None;
    }
    forecaster.forecast(series)
}
