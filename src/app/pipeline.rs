//! Shared estimate workflow used by the CLI commands.
//!
//! Keeping this in one place means the command handlers only deal with
//! presentation (printing vs exporting):
//! ingest -> validate + price (parallel) -> dedupe by estimate id

use rayon::prelude::*;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{EstimateInput, EstimateResult};
use crate::engine::EstimateEngine;
use crate::error::{AppError, EstimateError};
use crate::io::ingest::{IngestedInputs, RowError};
use crate::store::{EstimateRepository, InMemoryEstimateStore, InsertOutcome};

/// An input the engine refused.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub source: String,
    pub error: EstimateError,
}

/// An input whose estimate id matched an earlier input in the same batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub source: String,
    pub estimate_id: String,
}

/// All computed outputs of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Unique estimates, in input order.
    pub estimates: Vec<EstimateResult>,
    pub rejected: Vec<Rejection>,
    pub duplicates: Vec<Duplicate>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Price a single typed input.
pub fn run_estimate(engine: &EstimateEngine, input: &EstimateInput) -> Result<EstimateResult, AppError> {
    let result = engine.generate(input)?;
    info!(estimate_id = %result.estimate_id, band = result.regional_band.band.as_str(), "estimate generated");
    Ok(result)
}

/// Price a single raw JSON input.
pub fn run_estimate_value(engine: &EstimateEngine, value: &Value) -> Result<EstimateResult, AppError> {
    let result = engine.generate_from_value(value)?;
    info!(estimate_id = %result.estimate_id, band = result.regional_band.band.as_str(), "estimate generated");
    Ok(result)
}

/// Price every ingested input. Individual failures are collected, never fatal.
pub fn run_batch(engine: &EstimateEngine, ingested: IngestedInputs) -> BatchOutput {
    let IngestedInputs {
        items,
        row_errors,
        rows_read,
    } = ingested;

    let priced: Vec<Result<EstimateResult, EstimateError>> = items
        .par_iter()
        .map(|item| engine.generate_from_value(&item.value))
        .collect();

    let mut store = InMemoryEstimateStore::new();
    let mut out = BatchOutput {
        row_errors,
        rows_read,
        ..BatchOutput::default()
    };

    for (item, outcome) in items.into_iter().zip(priced) {
        match outcome {
            Ok(result) => {
                let estimate_id = result.estimate_id.clone();
                match store.insert(result.clone()) {
                    InsertOutcome::Inserted => out.estimates.push(result),
                    InsertOutcome::Duplicate => {
                        warn!(source = %item.source, %estimate_id, "duplicate estimate in batch");
                        out.duplicates.push(Duplicate {
                            source: item.source,
                            estimate_id,
                        });
                    }
                }
            }
            Err(error) => {
                warn!(source = %item.source, %error, "input rejected");
                out.rejected.push(Rejection {
                    source: item.source,
                    error,
                });
            }
        }
    }

    info!(
        estimates = out.estimates.len(),
        rejected = out.rejected.len(),
        duplicates = out.duplicates.len(),
        skipped_rows = out.row_errors.len(),
        "batch complete"
    );
    out
}
