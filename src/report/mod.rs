//! Presentation helpers: KPI formatting, the trend insight, and chart specs.
//!
//! Nothing here computes business values; it only turns snapshots and series
//! into strings and display structures.

use crate::domain::{FilterCriteria, Granularity, KpiSnapshot};

pub mod chart;
pub mod format;

pub use chart::*;
pub use format::*;

/// Rendered in place of any value that is not available.
pub const NOT_AVAILABLE: &str = "N/A";

pub const PRICE_UNIT: &str = "¢/kWh";

/// KPI labels and formatted values, in display order.
pub fn present_kpis(kpi: &KpiSnapshot) -> Vec<(String, String)> {
    vec![
        (format!("Average Price ({PRICE_UNIT})"), fmt_price(kpi.average_price)),
        (format!("Max Price ({PRICE_UNIT})"), fmt_price(kpi.max_price)),
        ("% Price Change".to_string(), fmt_percent(kpi.percent_change)),
        ("Total Sales (kWh)".to_string(), fmt_grouped(Some(kpi.sales_total))),
        ("Total Revenue ($)".to_string(), fmt_currency(Some(kpi.revenue_total))),
    ]
}

/// One-sentence trend summary, produced only for monthly views with data.
pub fn format_insight(
    criteria: &FilterCriteria,
    kpi: &KpiSnapshot,
    granularity: Granularity,
) -> Option<String> {
    if granularity != Granularity::Monthly || kpi.is_empty() {
        return None;
    }
    let (first, last) = (kpi.first_price?, kpi.last_price?);
    let avg = kpi.average_price?;
    let max = kpi.max_price?;
    let trend = if last > first { "increased" } else { "decreased" };
    Some(format!(
        "From {} to {}, prices for the {} sector have {trend}. Average was {avg:.2} {PRICE_UNIT}, peak {max:.2} {PRICE_UNIT}.",
        criteria.start.format("%B %Y"),
        criteria.end.format("%B %Y"),
        criteria.sector,
    ))
}

fn available(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

pub fn fmt_price(v: Option<f64>) -> String {
    available(v)
        .map(|x| format!("{x:.2} {PRICE_UNIT}"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn fmt_percent(v: Option<f64>) -> String {
    available(v)
        .map(|x| format!("{x:.2}%"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Round to an integer and group thousands with commas (`1234567.8` -> `1,234,568`).
pub fn fmt_grouped(v: Option<f64>) -> String {
    available(v)
        .map(group_thousands)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn fmt_currency(v: Option<f64>) -> String {
    match available(v) {
        Some(x) if x < 0.0 => format!("-${}", group_thousands(-x)),
        Some(x) => format!("${}", group_thousands(x)),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn group_thousands(v: f64) -> String {
    let rounded = format!("{:.0}", v.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if v < 0.0 && rounded != "0" {
        out.insert(0, '-');
    }
    out
}
