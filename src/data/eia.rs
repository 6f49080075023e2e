//! EIA v2 API integration for monthly electricity retail sales.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::data::PriceSource;
use crate::domain::{Dataset, Observation};
use crate::error::AppError;

const BASE_URL: &str = "https://api.eia.gov/v2/electricity/retail-sales/data/";
const ROW_LIMIT: usize = 5000;

const ENV_API_KEY: &str = "EIA_API_KEY";
const ENV_BASE_URL: &str = "EIA_BASE_URL";

pub struct EiaClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl EiaClient {
    /// Build a client from the process environment (`.env` is honored).
    ///
    /// A missing key is not an error here: the request goes out unauthenticated,
    /// fails, and the loader reports an empty dataset.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(ENV_API_KEY).ok().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!("{ENV_API_KEY} is not set; EIA requests will fail authentication");
        }
        let base_url = std::env::var(ENV_BASE_URL).unwrap_or_else(|_| BASE_URL.to_string());
        Self::new(api_key, base_url)
    }

    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }

    fn fetch_rows(&self, region: &str) -> Result<Vec<RawRow>, AppError> {
        let length = ROW_LIMIT.to_string();
        let api_key = self.api_key.as_deref().unwrap_or("");
        let query: [(&str, &str); 11] = [
            ("api_key", api_key),
            ("data[0]", "price"),
            ("data[1]", "revenue"),
            ("data[2]", "sales"),
            ("data[3]", "customers"),
            ("frequency", "monthly"),
            ("facets[stateid][]", region),
            ("sort[0][column]", "period"),
            ("sort[0][direction]", "asc"),
            ("offset", "0"),
            ("length", length.as_str()),
        ];
        debug!(region, url = %self.base_url, length = ROW_LIMIT, "requesting EIA retail sales");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .map_err(|e| AppError::data(format!("EIA request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| AppError::data(format!("Failed to read EIA response: {e}")))?;

        if !status.is_success() {
            return Err(AppError::data(format!("EIA request failed with status {status}.")));
        }

        parse_envelope(&body)
    }
}

impl PriceSource for EiaClient {
    fn fetch(&self, region: &str) -> Result<Dataset, AppError> {
        let rows = self.fetch_rows(region)?;
        Ok(normalize_rows(region, rows))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Option<ResponseBody>,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    data: Option<Vec<RawRow>>,
}

/// One row as published. Numeric fields arrive as strings, numbers, or null.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawRow {
    period: Option<String>,
    #[serde(rename = "sectorName")]
    sector_name: Option<String>,
    sectorid: Option<String>,
    price: Option<Value>,
    revenue: Option<Value>,
    sales: Option<Value>,
    customers: Option<Value>,
}

/// Extract `response.data` from a response body.
///
/// Anything without that shape (including EIA's `{"error": ...}` bodies) is a failure.
pub(crate) fn parse_envelope(body: &str) -> Result<Vec<RawRow>, AppError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| AppError::data(format!("Failed to parse EIA response: {e}")))?;
    envelope
        .response
        .and_then(|r| r.data)
        .ok_or_else(|| AppError::data("EIA response is missing `response.data`."))
}

/// Turn raw rows into a dataset, dropping rows without a usable period, sector, or price.
pub(crate) fn normalize_rows(region: &str, rows: Vec<RawRow>) -> Dataset {
    let total = rows.len();
    let mut out = Vec::with_capacity(total);
    let mut dropped = 0usize;

    for row in rows {
        let Some(period) = row.period.as_deref().and_then(parse_period) else {
            dropped += 1;
            continue;
        };
        let Some(sector) = row.sector_name.filter(|s| !s.trim().is_empty()) else {
            dropped += 1;
            continue;
        };
        let Some(price) = parse_value(row.price.as_ref()) else {
            dropped += 1;
            continue;
        };
        out.push(Observation {
            period,
            sector,
            sector_id: row.sectorid,
            price,
            revenue: parse_value(row.revenue.as_ref()),
            sales: parse_value(row.sales.as_ref()),
            customers: parse_count(row.customers.as_ref()),
        });
    }

    if dropped > 0 {
        debug!(dropped, total, "dropped EIA rows without period, sector, or price");
    }

    let dataset = Dataset::new(region, out);
    debug!(rows = dataset.len(), sectors = dataset.sectors().len(), "normalized EIA dataset");
    dataset
}

/// Parse a numeric field, coercing anything unusable to `None`.
pub fn parse_value(raw: Option<&Value>) -> Option<f64> {
    let v = match raw? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.replace(',', "").parse::<f64>().ok()?
        }
        _ => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}

fn parse_count(raw: Option<&Value>) -> Option<u64> {
    let v = parse_value(raw)?;
    if v >= 0.0 { Some(v.round() as u64) } else { None }
}

/// Parse an EIA monthly period (`YYYY-MM`); full dates are accepted too.
pub fn parse_period(raw: &str) -> Option<chrono::NaiveDate> {
    let trimmed = raw.trim();
    chrono::NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
        .or_else(|_| chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
        .map(crate::domain::month_start)
}
