//! Chart spec: the render-agnostic description of the price trend chart.
//!
//! Both the ASCII plot and the TUI chart draw from a `ChartSpec`, and the
//! `--export-chart` flag writes it out as JSON.

use serde::{Deserialize, Serialize};

use crate::domain::{ForecastSeries, Granularity, SeriesPoint, fractional_year};
use crate::report::PRICE_UNIT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Fractional year, used as the x coordinate.
    pub x: f64,
    pub label: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub granularity: Granularity,
    pub history: Vec<ChartPoint>,
    /// Drawn as a dashed overlay when present.
    pub forecast: Option<Vec<ChartPoint>>,
}

impl ChartSpec {
    /// X range covering history and forecast.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.all_points().map(|p| p.x))
    }

    /// Y range covering history and forecast.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.all_points().map(|p| p.price))
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.forecast.as_ref().is_none_or(|f| f.is_empty())
    }

    fn all_points(&self) -> impl Iterator<Item = &ChartPoint> {
        self.history
            .iter()
            .chain(self.forecast.iter().flat_map(|f| f.iter()))
    }
}

/// Build the chart spec for a rolled-up series and optional forecast.
pub fn chart_spec(
    series: &[SeriesPoint],
    forecast: Option<&ForecastSeries>,
    sector: &str,
    granularity: Granularity,
) -> ChartSpec {
    let history = series
        .iter()
        .map(|p| ChartPoint {
            x: fractional_year(p.period),
            label: p.label.clone(),
            price: p.price,
        })
        .collect();

    let forecast = forecast.map(|f| {
        f.points
            .iter()
            .map(|p| ChartPoint {
                x: fractional_year(p.period),
                label: p.period.format("%Y-%m").to_string(),
                price: p.price,
            })
            .collect()
    });

    let x_label = match granularity {
        Granularity::Monthly => "Date",
        Granularity::Yearly => "Year",
    };

    ChartSpec {
        title: format!("Electricity Price Trend for {sector} Sector"),
        x_label: x_label.to_string(),
        y_label: PRICE_UNIT.to_string(),
        granularity,
        history,
        forecast,
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}
