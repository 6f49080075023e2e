//! Linear trend plus yearly seasonality, fit by least squares.
//!
//! Model (t in years since the first observation):
//!
//! ```text
//! y(t) = β0 + β1·t + Σ_k [a_k·sin(2πk·t) + b_k·cos(2πk·t)]
//! ```
//!
//! Seasonality is only switched on once the history covers two full years;
//! with less data a single cycle cannot be separated from the trend.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{ForecastPoint, ForecastSeries, SeriesPoint, month_start, shift_months};
use crate::forecast::{Forecaster, HORIZON_MONTHS};
use crate::math::{push_yearly_terms, solve_least_squares, yearly_columns};

#[derive(Debug, Clone)]
pub struct SeasonalTrendForecaster {
    /// Maximum number of yearly Fourier pairs.
    pub max_order: usize,
    /// History span (years) required before seasonal terms are used.
    pub min_seasonal_span_years: f64,
}

impl Default for SeasonalTrendForecaster {
    fn default() -> Self {
        Self {
            max_order: 3,
            min_seasonal_span_years: 2.0,
        }
    }
}

impl SeasonalTrendForecaster {
    /// Fourier order for `n` points spanning `span` years.
    fn order_for(&self, n: usize, span: f64) -> usize {
        if span < self.min_seasonal_span_years {
            return 0;
        }
        let mut order = self.max_order;
        while order > 0 && 2 + yearly_columns(order) > n {
            order -= 1;
        }
        order
    }

    fn design_row(t: f64, order: usize) -> Vec<f64> {
        let mut row = Vec::with_capacity(2 + yearly_columns(order));
        row.push(1.0);
        row.push(t);
        push_yearly_terms(t, order, &mut row);
        row
    }
}

impl Forecaster for SeasonalTrendForecaster {
    fn forecast(&self, series: &[SeriesPoint]) -> Option<ForecastSeries> {
        // Average any repeated months so each period contributes once.
        let mut by_month: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for p in series.iter().filter(|p| p.price.is_finite()) {
            let entry = by_month.entry(month_start(p.period)).or_insert((0.0, 0));
            entry.0 += p.price;
            entry.1 += 1;
        }
        if by_month.len() < 2 {
            debug!(points = by_month.len(), "forecast skipped: fewer than two distinct months");
            return None;
        }

        let origin = *by_month.keys().next()?;
        let last = *by_month.keys().next_back()?;
        let n = by_month.len();
        let span = years_between(origin, last);
        let order = self.order_for(n, span);
        let cols = 2 + yearly_columns(order);

        let mut data = Vec::with_capacity(n * cols);
        let mut ys = Vec::with_capacity(n);
        for (&period, &(sum, count)) in &by_month {
            data.extend(Self::design_row(years_between(origin, period), order));
            ys.push(sum / count as f64);
        }
        let x = DMatrix::from_row_slice(n, cols, &data);
        let y = DVector::from_vec(ys);
        let beta = solve_least_squares(&x, &y)?;

        let mut points = Vec::with_capacity(HORIZON_MONTHS);
        for h in 1..=HORIZON_MONTHS {
            let period = shift_months(last, h as i32)?;
            let row = DVector::from_vec(Self::design_row(years_between(origin, period), order));
            let price = row.dot(&beta);
            if !price.is_finite() {
                return None;
            }
            points.push(ForecastPoint { period, price });
        }

        debug!(n, order, span, "forecast fitted");
        Some(ForecastSeries { points })
    }
}

fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    let months = (to.year() - from.year()) * 12 + to.month0() as i32 - from.month0() as i32;
    months as f64 / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly_series(start: NaiveDate, prices: &[f64]) -> Vec<SeriesPoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| SeriesPoint::monthly(shift_months(start, i as i32).unwrap(), p))
            .collect()
    }

    #[test]
    fn twelve_consecutive_months_after_last_input() {
        let start = NaiveDate::from_ymd_opt(2022, 5, 1).unwrap();
        let prices: Vec<f64> = (0..30).map(|i| 10.0 + 0.05 * i as f64).collect();
        let series = monthly_series(start, &prices);
        let fc = SeasonalTrendForecaster::default().forecast(&series).unwrap();

        assert_eq!(fc.len(), HORIZON_MONTHS);
        let last_input = series.last().unwrap().period;
        assert_eq!(fc.points[0].period, shift_months(last_input, 1).unwrap());
        for w in fc.points.windows(2) {
            assert!(w[0].period < w[1].period);
            assert_eq!(shift_months(w[0].period, 1).unwrap(), w[1].period);
        }
    }

    #[test]
    fn linear_history_extrapolates_linearly() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let prices: Vec<f64> = (0..12).map(|i| 10.0 + 0.1 * i as f64).collect();
        let fc = SeasonalTrendForecaster::default()
            .forecast(&monthly_series(start, &prices))
            .unwrap();
        // Next month continues the line: 10.0 + 0.1 * 12.
        assert!((fc.points[0].price - 11.2).abs() < 1e-6, "{}", fc.points[0].price);
        assert!((fc.points[11].price - 12.3).abs() < 1e-6, "{}", fc.points[11].price);
    }

    #[test]
    fn seasonal_history_repeats_its_cycle() {
        let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let prices: Vec<f64> = (0..48)
            .map(|i| 15.0 + (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
            .collect();
        let fc = SeasonalTrendForecaster::default()
            .forecast(&monthly_series(start, &prices))
            .unwrap();
        for (h, p) in fc.points.iter().enumerate() {
            let expected = 15.0 + (2.0 * std::f64::consts::PI * (48 + h) as f64 / 12.0).sin();
            assert!((p.price - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn degenerate_input_yields_none() {
        let f = SeasonalTrendForecaster::default();
        assert!(f.forecast(&[]).is_none());

        let jan = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let single = vec![SeriesPoint::monthly(jan, 10.0)];
        assert!(f.forecast(&single).is_none());

        let same_date = vec![SeriesPoint::monthly(jan, 10.0), SeriesPoint::monthly(jan, 12.0)];
        assert!(f.forecast(&same_date).is_none());
    }

    #[test]
    fn two_points_are_enough() {
        let jan = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        let series = vec![SeriesPoint::monthly(jan, 10.0), SeriesPoint::monthly(feb, 11.0)];
        let fc = SeasonalTrendForecaster::default().forecast(&series).unwrap();
        assert_eq!(fc.len(), HORIZON_MONTHS);
        assert!((fc.points[0].price - 12.0).abs() < 1e-6);
    }
}
