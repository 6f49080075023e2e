use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Dataset, Granularity, SeriesPoint};

/// Build the charted price series at the requested granularity.
///
/// Monthly is a pass-through. Yearly averages price per calendar year, one
/// point per year in ascending order.
pub fn rollup(filtered: &Dataset, granularity: Granularity) -> Vec<SeriesPoint> {
    match granularity {
        Granularity::Monthly => filtered
            .rows()
            .iter()
            .map(|r| SeriesPoint::monthly(r.period, r.price))
            .collect(),
        Granularity::Yearly => {
            let mut years: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
            for r in filtered.rows() {
                let entry = years.entry(r.period.year()).or_insert((0.0, 0));
                entry.0 += r.price;
                entry.1 += 1;
            }
            years
                .into_iter()
                .filter_map(|(year, (sum, n))| {
                    let period = NaiveDate::from_ymd_opt(year, 1, 1)?;
                    Some(SeriesPoint {
                        period,
                        label: year.to_string(),
                        price: sum / n as f64,
                    })
                })
                .collect()
        }
    }
}
