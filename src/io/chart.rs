//! Read/write chart spec JSON files.
//!
//! Chart JSON is the "portable" representation of one dashboard view:
//! title, axis labels, the charted history, and the forecast overlay.
//! The schema is defined by `report::ChartSpec`.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;
use crate::report::ChartSpec;

/// Write a chart JSON file.
pub fn write_chart_json(path: &Path, spec: &ChartSpec) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create chart JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, spec)
        .map_err(|e| AppError::usage(format!("Failed to write chart JSON: {e}")))?;
    Ok(())
}

/// Read a chart JSON file.
pub fn read_chart_json(path: &Path) -> Result<ChartSpec, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open chart JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::usage(format!("Invalid chart JSON: {e}")))
}
