//! KPI snapshot over a filtered dataset.

use crate::domain::{Dataset, KpiSnapshot};

/// Compute summary KPIs in dataset (period) order.
///
/// Price statistics are `None` for empty input; the percent change is also
/// `None` when the first price is zero. Missing sales/revenue contribute zero.
pub fn summarize(filtered: &Dataset) -> KpiSnapshot {
    let rows = filtered.rows();
    let prices: Vec<f64> = rows.iter().map(|r| r.price).filter(|p| p.is_finite()).collect();

    let average_price = if prices.is_empty() {
        None
    } else {
        Some(prices.iter().sum::<f64>() / prices.len() as f64)
    };
    let max_price = prices.iter().copied().reduce(f64::max);

    let first_price = prices.first().copied();
    let last_price = prices.last().copied();
    let percent_change = match (first_price, last_price) {
        (Some(first), Some(last)) => percent_change(first, last),
        _ => None,
    };

    let sales_total = rows.iter().filter_map(|r| r.sales).sum();
    let revenue_total = rows.iter().filter_map(|r| r.revenue).sum();

    KpiSnapshot {
        average_price,
        max_price,
        percent_change,
        sales_total,
        revenue_total,
        first_price,
        last_price,
        observations: rows.len(),
    }
}

fn percent_change(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 {
        return None;
    }
    let change = (last - first) / first * 100.0;
    change.is_finite().then_some(change)
}
