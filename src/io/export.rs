//! Export the charted series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::report::ChartSpec;

/// Write history and forecast rows to a CSV file.
pub fn write_series_csv(path: &Path, spec: &ChartSpec) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series(&mut file, spec)
}

fn write_series<W: Write>(out: &mut W, spec: &ChartSpec) -> Result<(), AppError> {
    writeln!(out, "kind,label,x,price")
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    let forecast = spec.forecast.iter().flat_map(|f| f.iter()).map(|p| ("forecast", p));
    for (kind, p) in spec.history.iter().map(|p| ("actual", p)).chain(forecast) {
        writeln!(out, "{kind},{},{:.6},{:.4}", p.label, p.x, p.price)
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
