//! Shared "view pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! dataset -> filter -> KPIs -> rollup -> forecast -> insight/chart
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;

use crate::analysis::{filter, rollup, summarize};
use crate::domain::{Dataset, FilterCriteria, ForecastSeries, Granularity, KpiSnapshot, SeriesPoint};
use crate::error::AppError;
use crate::forecast::{Forecaster, forecast_if_enabled};
use crate::report::{ChartSpec, chart_spec, format_insight};

/// What the user currently has selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub criteria: FilterCriteria,
    pub granularity: Granularity,
    pub forecast: bool,
}

/// All computed outputs for one selection. Recomputed on every change.
#[derive(Debug, Clone)]
pub struct ViewOutput {
    pub request: ViewRequest,
    pub filtered: Dataset,
    pub kpi: KpiSnapshot,
    pub series: Vec<SeriesPoint>,
    pub forecast: Option<ForecastSeries>,
    pub insight: Option<String>,
    pub chart: ChartSpec,
}

/// Run the full pipeline for one selection.
///
/// KPIs are always computed from monthly rows, whatever the charted granularity.
pub fn build_view(dataset: &Dataset, request: &ViewRequest, forecaster: &dyn Forecaster) -> ViewOutput {
    let filtered = filter(dataset, &request.criteria);
    let kpi = summarize(&filtered);
    let series = rollup(&filtered, request.granularity);
    let forecast = forecast_if_enabled(forecaster, &series, request.granularity, request.forecast);
    let insight = format_insight(&request.criteria, &kpi, request.granularity);
    let chart = chart_spec(&series, forecast.as_ref(), &request.criteria.sector, request.granularity);

    ViewOutput {
        request: request.clone(),
        filtered,
        kpi,
        series,
        forecast,
        insight,
        chart,
    }
}

/// Resolve optional user selections against a loaded dataset.
///
/// - sector defaults to the first sector seen; unknown sectors are rejected
/// - start/end default to the dataset range and are clamped into it
pub fn resolve_criteria(
    dataset: &Dataset,
    sector: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<FilterCriteria, AppError> {
    let (min_date, max_date) = dataset
        .date_range()
        .ok_or_else(|| AppError::data("Failed to load data from EIA API."))?;

    let sectors = dataset.sectors();
    let sector = match sector {
        Some(s) if dataset.has_sector(s) => s.to_string(),
        Some(s) => {
            return Err(AppError::usage(format!(
                "Unknown sector '{s}'. Available: {}.",
                sectors.join(", ")
            )));
        }
        None => sectors
            .first()
            .cloned()
            .ok_or_else(|| AppError::data("Dataset has no sectors."))?,
    };

    let start = start.unwrap_or(min_date).clamp(min_date, max_date);
    let end = end.unwrap_or(max_date).clamp(min_date, max_date);
    FilterCriteria::new(sector, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use crate::forecast::SeasonalTrendForecaster;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn dataset() -> Dataset {
        let mut rows = Vec::new();
        for m in 1..=12 {
            for sector in ["residential", "commercial"] {
                rows.push(Observation {
                    period: d(2023, m),
                    sector: sector.to_string(),
                    sector_id: None,
                    price: 10.0 + m as f64 / 10.0,
                    revenue: Some(5.0),
                    sales: Some(50.0),
                    customers: None,
                });
            }
        }
        Dataset::new("NY", rows)
    }

    #[test]
    fn resolve_defaults_and_clamps() {
        let ds = dataset();
        let c = resolve_criteria(&ds, None, None, None).unwrap();
        assert_eq!(c.sector, "residential");
        assert_eq!((c.start, c.end), (d(2023, 1), d(2023, 12)));

        let c = resolve_criteria(&ds, Some("commercial"), Some(d(2020, 1)), Some(d(2030, 1))).unwrap();
        assert_eq!(c.sector, "commercial");
        assert_eq!((c.start, c.end), (d(2023, 1), d(2023, 12)));

        assert!(resolve_criteria(&ds, Some("nuclear"), None, None).is_err());
        assert!(resolve_criteria(&ds, None, Some(d(2023, 9)), Some(d(2023, 2))).is_err());
        assert!(resolve_criteria(&Dataset::empty("NY"), None, None, None).is_err());
    }

    #[test]
    fn yearly_view_has_no_forecast_or_insight() {
        let ds = dataset();
        let request = ViewRequest {
            criteria: resolve_criteria(&ds, None, None, None).unwrap(),
            granularity: Granularity::Yearly,
            forecast: true,
        };
        let view = build_view(&ds, &request, &SeasonalTrendForecaster::default());
        assert_eq!(view.series.len(), 1);
        assert!(view.forecast.is_none());
        assert!(view.insight.is_none());
        assert_eq!(view.kpi.observations, 12);
    }

    #[test]
    fn monthly_view_with_forecast() {
        let ds = dataset();
        let request = ViewRequest {
            criteria: resolve_criteria(&ds, Some("commercial"), None, None).unwrap(),
            granularity: Granularity::Monthly,
            forecast: true,
        };
        let view = build_view(&ds, &request, &SeasonalTrendForecaster::default());
        assert_eq!(view.series.len(), 12);
        assert_eq!(view.forecast.as_ref().map(|f| f.len()), Some(12));
        assert_eq!(view.chart.forecast.as_ref().map(|f| f.len()), Some(12));
        assert!(view.insight.unwrap().contains("commercial sector have increased"));
        assert_eq!(view.kpi.sales_total, 600.0);
    }

    #[test]
    fn full_year_residential_kpis() {
        let rows = (1..=12)
            .map(|m| Observation {
                period: d(2023, m),
                sector: "Residential".to_string(),
                sector_id: Some("RES".to_string()),
                price: if m == 12 { 11.0 } else { 10.0 },
                revenue: Some(1_000.0),
                sales: Some(2_000.0),
                customers: Some(7_000_000),
            })
            .collect();
        let ds = Dataset::new("NY", rows);
        let request = ViewRequest {
            criteria: FilterCriteria::new("Residential", d(2023, 1), d(2023, 12)).unwrap(),
            granularity: Granularity::Monthly,
            forecast: false,
        };
        let view = build_view(&ds, &request, &SeasonalTrendForecaster::default());

        let avg = view.kpi.average_price.unwrap();
        assert!((avg - 121.0 / 12.0).abs() < 1e-12);
        assert_eq!(view.kpi.max_price, Some(11.0));
        assert!((view.kpi.percent_change.unwrap() - 10.0).abs() < 1e-9);

        let cards = crate::report::present_kpis(&view.kpi);
        assert_eq!(cards[0].1, "10.08 ¢/kWh");
        assert_eq!(cards[1].1, "11.00 ¢/kWh");
        assert_eq!(cards[2].1, "10.00%");
        assert_eq!(cards[3].1, "24,000");
        assert_eq!(cards[4].1, "$12,000");
        assert!(view.insight.unwrap().contains("Residential sector have increased"));
    }

    #[test]
    fn empty_range_presents_not_available() {
        let ds = dataset();
        let request = ViewRequest {
            criteria: FilterCriteria::new("residential", d(2030, 1), d(2030, 6)).unwrap(),
            granularity: Granularity::Monthly,
            forecast: true,
        };
        let view = build_view(&ds, &request, &SeasonalTrendForecaster::default());
        assert!(view.filtered.is_empty());
        assert!(view.kpi.is_empty());
        assert!(view.series.is_empty());
        assert!(view.forecast.is_none());
        assert!(view.insight.is_none());
        assert!(view.chart.is_empty());

        let values: Vec<String> = crate::report::present_kpis(&view.kpi)
            .into_iter()
            .map(|(_, v)| v)
            .collect();
        assert_eq!(values, ["N/A", "N/A", "N/A", "0", "$0"]);
    }

    #[test]
    fn sample_source_feeds_the_pipeline() {
        let ds = crate::data::load(&crate::data::SampleSource::new(42), "NY");
        let criteria = resolve_criteria(&ds, Some("residential"), Some(d(2022, 1)), None).unwrap();
        let view = build_view(
            &ds,
            &ViewRequest { criteria, granularity: Granularity::Monthly, forecast: true },
            &SeasonalTrendForecaster::default(),
        );
        assert_eq!(view.filtered.len(), 36);
        assert_eq!(view.forecast.as_ref().map(|f| f.len()), Some(12));
        assert_eq!(view.forecast.unwrap().points[0].period, d(2025, 1));
    }
}
