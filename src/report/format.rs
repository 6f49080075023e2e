//! Formatted terminal output for the `summary` and `sectors` commands.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::app::pipeline::ViewOutput;
use crate::domain::Dataset;
use crate::report::{NOT_AVAILABLE, present_kpis};

/// Format the full view summary (selection + KPIs + insight + series table).
pub fn format_run_summary(dataset: &Dataset, view: &ViewOutput) -> String {
    let mut out = String::new();
    let request = &view.request;

    out.push_str(&format!("=== Energy Market Price Tracker - {} ===\n", dataset.region()));
    out.push_str(&format!("Sector: {}\n", request.criteria.sector));
    out.push_str(&format!(
        "Range: {} to {} | granularity: {} | forecast: {}\n",
        request.criteria.start.format("%Y-%m"),
        request.criteria.end.format("%Y-%m"),
        request.granularity.display_name(),
        if request.forecast { "on" } else { "off" },
    ));
    out.push_str(&format!(
        "Rows: {} of {} loaded\n",
        view.filtered.len(),
        dataset.len()
    ));

    out.push_str("\nKPIs:\n");
    for (label, value) in present_kpis(&view.kpi) {
        out.push_str(&format!("  {label:<24} {value}\n"));
    }

    if let Some(insight) = &view.insight {
        out.push('\n');
        out.push_str(insight);
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format_series_table(view));
    out
}

/// Price table for the charted series, with forecast rows marked.
pub fn format_series_table(view: &ViewOutput) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<10} {:>12} {:<8}\n", view.chart.x_label, view.chart.y_label, "kind").trim_end().to_string());
    out.push('\n');
    out.push_str(format!("{:-<10} {:-<12} {:-<8}", "", "", "").trim_end());
    out.push('\n');

    if view.series.is_empty() {
        out.push_str(&format!("{NOT_AVAILABLE}\n"));
        return out;
    }

    for p in &view.series {
        out.push_str(format!("{:<10} {:>12.2} {:<8}", p.label, p.price, "actual").trim_end());
        out.push('\n');
    }
    if let Some(fc) = &view.forecast {
        for p in &fc.points {
            out.push_str(
                format!("{:<10} {:>12.2} {:<8}", p.period.format("%Y-%m"), p.price, "forecast").trim_end(),
            );
            out.push('\n');
        }
    }
    out
}

/// List the dataset's sectors with their row counts and date ranges.
pub fn format_sector_list(dataset: &Dataset) -> String {
    let mut out = String::new();
    if let Some((first, last)) = dataset.date_range() {
        out.push_str(&format!(
            "{}: {} rows, {} to {}\n",
            dataset.region(),
            dataset.len(),
            first.format("%Y-%m"),
            last.format("%Y-%m"),
        ));
    }
    for sector in dataset.sectors() {
        let rows: Vec<_> = dataset.rows().iter().filter(|r| r.sector == sector).collect();
        let id = rows
            .first()
            .and_then(|r| r.sector_id.as_deref())
            .unwrap_or("");
        out.push_str(&format!("  {:<16} {:<4} {:>5} rows\n", sector, id, rows.len()));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::app::pipeline::{ViewRequest, build_view, resolve_criteria};
    use crate::domain::{Granularity, Observation};
    use crate::forecast::SeasonalTrendForecaster;

    fn dataset() -> Dataset {
        let rows = (1..=3)
            .map(|m| Observation {
                period: NaiveDate::from_ymd_opt(2023, m, 1).unwrap(),
                sector: "residential".to_string(),
                sector_id: Some("RES".to_string()),
                price: 20.0 + m as f64,
                revenue: Some(1_500.0),
                sales: Some(7_000.0),
                customers: None,
            })
            .collect();
        Dataset::new("NY", rows)
    }

    #[test]
    fn summary_contains_kpis_and_insight() {
        let ds = dataset();
        let request = ViewRequest {
            criteria: resolve_criteria(&ds, None, None, None).unwrap(),
            granularity: Granularity::Monthly,
            forecast: false,
        };
        let view = build_view(&ds, &request, &SeasonalTrendForecaster::default());
        let txt = format_run_summary(&ds, &view);

        assert!(txt.starts_with("=== Energy Market Price Tracker - NY ===\n"));
        assert!(txt.contains("Average Price (¢/kWh)    22.00 ¢/kWh\n"));
        assert!(txt.contains("Total Revenue ($)        $4,500\n"));
        assert!(txt.contains("From January 2023 to March 2023"));
        assert!(txt.contains("2023-03           23.00 actual\n"));
        assert!(!txt.contains("forecast\n"));
    }

    #[test]
    fn sector_list() {
        let txt = format_sector_list(&dataset());
        assert_eq!(
            txt,
            "NY: 3 rows, 2023-01 to 2023-03\n  residential      RES      3 rows\n"
        );
    }
}
