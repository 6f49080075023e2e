//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - normalized retail-sales rows (`Observation`) and the per-region `Dataset`
//! - user-selected view settings (`FilterCriteria`, `Granularity`)
//! - derived outputs (`KpiSnapshot`, `SeriesPoint`, `ForecastSeries`)

pub mod types;

pub use types::*;
