//! Filtering and aggregation over a loaded dataset.
//!
//! All functions here are pure: they take the immutable dataset plus the
//! user's current selection and return fresh values.

pub mod filter;
pub mod kpi;
pub mod rollup;

pub use filter::filter;
pub use kpi::summarize;
pub use rollup::rollup;
