//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the filter/aggregate/forecast pipeline
//! - exported to JSON/CSV
//! - rendered by either front-end (text summary or TUI)

use std::collections::HashSet;

use chrono::{Datelike, Months, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One monthly retail-sales row for a single sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// First day of the reporting month.
    pub period: NaiveDate,
    /// Sector label as published (e.g. `residential`).
    pub sector: String,
    /// Short sector code (e.g. `RES`), when the source provides one.
    pub sector_id: Option<String>,
    /// Average retail price, ¢/kWh.
    pub price: f64,
    pub revenue: Option<f64>,
    pub sales: Option<f64>,
    pub customers: Option<u64>,
}

/// Observations for one region, ordered by period.
///
/// Invariants (established by [`Dataset::new`]):
/// - rows are sorted by `period` ascending; rows sharing a period keep their
///   source order
/// - no two rows share the same `(period, sector)` pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    region: String,
    rows: Vec<Observation>,
}

impl Dataset {
    /// Build a dataset, sorting by period and dropping duplicate `(period, sector)` rows.
    ///
    /// The first occurrence of a duplicated pair wins.
    pub fn new(region: impl Into<String>, mut rows: Vec<Observation>) -> Self {
        rows.sort_by_key(|r| r.period);
        let mut seen: HashSet<(NaiveDate, String)> = HashSet::with_capacity(rows.len());
        rows.retain(|r| seen.insert((r.period, r.sector.clone())));
        Self {
            region: region.into(),
            rows,
        }
    }

    pub fn empty(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            rows: Vec::new(),
        }
    }

    /// Subset constructor for callers that only ever remove rows.
    pub(crate) fn from_ordered_subset(region: &str, rows: Vec<Observation>) -> Self {
        Self {
            region: region.to_string(),
            rows,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct sector labels in first-seen order.
    pub fn sectors(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|r| seen.insert(r.sector.as_str()))
            .map(|r| r.sector.clone())
            .collect()
    }

    pub fn has_sector(&self, sector: &str) -> bool {
        self.rows.iter().any(|r| r.sector == sector)
    }

    /// First and last observed period.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?.period;
        let last = self.rows.last()?.period;
        Some((first, last))
    }
}

/// Which rows to keep: one sector over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub sector: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FilterCriteria {
    pub fn new(sector: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::usage(format!(
                "Start date {start} is after end date {end}."
            )));
        }
        Ok(Self {
            sector: sector.into(),
            start,
            end,
        })
    }

    pub fn contains(&self, period: NaiveDate) -> bool {
        self.start <= period && period <= self.end
    }
}

/// Temporal resolution of the charted price series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One point per observed month (pass-through).
    #[default]
    Monthly,
    /// One point per calendar year, price averaged.
    Yearly,
}

impl Granularity {
    pub fn display_name(self) -> &'static str {
        match self {
            Granularity::Monthly => "Monthly",
            Granularity::Yearly => "Yearly",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Granularity::Monthly => Granularity::Yearly,
            Granularity::Yearly => Granularity::Monthly,
        }
    }
}

/// Summary scalars for one filtered dataset.
///
/// `None` means "not available": the filtered set was empty, or (for the
/// percent change) the first price was zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub average_price: Option<f64>,
    pub max_price: Option<f64>,
    pub percent_change: Option<f64>,
    pub sales_total: f64,
    pub revenue_total: f64,
    pub first_price: Option<f64>,
    pub last_price: Option<f64>,
    pub observations: usize,
}

impl KpiSnapshot {
    pub fn is_empty(&self) -> bool {
        self.observations == 0
    }
}

/// One point of the charted (possibly rolled-up) price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Month start (monthly) or January 1st (yearly).
    pub period: NaiveDate,
    /// `YYYY-MM` (monthly) or `YYYY` (yearly).
    pub label: String,
    pub price: f64,
}

impl SeriesPoint {
    pub fn monthly(period: NaiveDate, price: f64) -> Self {
        Self {
            period,
            label: period.format("%Y-%m").to_string(),
            price,
        }
    }
}

/// One predicted month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: NaiveDate,
    pub price: f64,
}

/// Predicted prices extending past the last observed month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a month-start date by `n` months (negative moves backwards).
pub fn shift_months(date: NaiveDate, n: i32) -> Option<NaiveDate> {
    let months = Months::new(n.unsigned_abs());
    if n >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}

/// Calendar position as a fractional year (`2023-07-01` -> `2023.5`).
///
/// Used as the x coordinate for charts.
pub fn fractional_year(date: NaiveDate) -> f64 {
    date.year() as f64 + date.month0() as f64 / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(y: i32, m: u32, sector: &str, price: f64) -> Observation {
        Observation {
            period: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            sector: sector.to_string(),
            sector_id: None,
            price,
            revenue: None,
            sales: None,
            customers: None,
        }
    }

    #[test]
    fn dataset_sorts_and_drops_duplicate_pairs() {
        let ds = Dataset::new(
            "NY",
            vec![
                obs(2023, 2, "residential", 2.0),
                obs(2023, 1, "residential", 1.0),
                obs(2023, 1, "commercial", 5.0),
                obs(2023, 1, "residential", 9.0),
            ],
        );
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows()[0].price, 1.0);
        assert_eq!(ds.rows()[1].sector, "commercial");
        assert_eq!(ds.rows()[2].price, 2.0);
        assert_eq!(ds.sectors(), vec!["residential".to_string(), "commercial".to_string()]);
        let (first, last) = ds.date_range().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
    }

    #[test]
    fn criteria_rejects_inverted_range() {
        let a = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert!(FilterCriteria::new("residential", a, b).is_err());
        assert!(FilterCriteria::new("residential", b, a).is_ok());
        assert!(FilterCriteria::new("residential", a, a).is_ok());
    }

    #[test]
    fn month_helpers() {
        let d = NaiveDate::from_ymd_opt(2023, 12, 15).unwrap();
        assert_eq!(month_start(d), NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(
            shift_months(month_start(d), 1),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            shift_months(month_start(d), -12),
            NaiveDate::from_ymd_opt(2022, 12, 1)
        );
        assert!((fractional_year(NaiveDate::from_ymd_opt(2023, 7, 1).unwrap()) - 2023.5).abs() < 1e-12);
    }
}
