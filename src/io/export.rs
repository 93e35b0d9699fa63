//! Export estimates to CSV / JSON.
//!
//! The CSV export is meant to be easy to consume in spreadsheets: one row per
//! estimate, flat columns, prices as whole numbers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::EstimateResult;
use crate::error::AppError;

pub const CSV_HEADER: [&str; 12] = [
    "estimate_id",
    "zip_code",
    "square_footage",
    "regional_band",
    "regional_multiplier",
    "good_min",
    "good_max",
    "better_min",
    "better_max",
    "best_min",
    "best_max",
    "created_at",
];

/// Write one CSV row per estimate.
pub fn write_results_csv(path: &Path, results: &[EstimateResult]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_csv(file, results)
}

pub fn write_csv<W: Write>(writer: W, results: &[EstimateResult]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in results {
        let t = &r.tier_ranges;
        let square_footage = r.input.square_footage.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([
            r.estimate_id.clone(),
            r.input.zip_code().to_string(),
            square_footage,
            r.regional_band.band.as_str().to_string(),
            r.regional_band.multiplier.to_string(),
            t.good.min.to_string(),
            t.good.max.to_string(),
            t.better.min.to_string(),
            t.better.max.to_string(),
            t.best.min.to_string(),
            t.best.max.to_string(),
            r.created_at.to_rfc3339(),
        ])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write estimates as a JSON array, in the same shape the web API serves.
pub fn write_results_json(path: &Path, results: &[EstimateResult], pretty: bool) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let written = if pretty {
        serde_json::to_writer_pretty(file, results)
    } else {
        serde_json::to_writer(file, results)
    };
    written.map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}
