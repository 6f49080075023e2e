//! Input/output helpers.
//!
//! - chart series CSV export (`export`)
//! - chart spec JSON read/write (`chart`)

pub mod chart;
pub mod export;

pub use chart::*;
pub use export::*;
