//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and environment settings
//! - installs the tracing subscriber
//! - dispatches to the estimate / batch / region handlers
//! - prints reports and writes optional exports

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::cli::{BatchArgs, Cli, Command, EstimateArgs, OutputArgs, RegionArgs};
use crate::config::Settings;
use crate::domain::OutputFormat;
use crate::engine::EstimateEngine;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `hvac-est` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    init_tracing(&settings.log_filter);

    let engine = EstimateEngine::new();
    match cli.command {
        Command::Estimate(args) => handle_estimate(&engine, args, &settings),
        Command::Batch(args) => handle_batch(&engine, args, &settings),
        Command::Region(args) => handle_region(&engine, args),
    }
}

/// Logs go to stderr so JSON on stdout stays machine-readable.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolved output options: CLI flags over environment settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputMode {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl OutputMode {
    pub fn resolve(args: &OutputArgs, settings: &Settings) -> Self {
        Self {
            format: args.format.unwrap_or(settings.format),
            pretty: settings.pretty_json && !args.compact,
        }
    }
}

fn handle_estimate(engine: &EstimateEngine, args: EstimateArgs, settings: &Settings) -> Result<(), AppError> {
    let mode = OutputMode::resolve(&args.output, settings);

    let result = match &args.input {
        Some(path) => {
            let ingested = crate::io::ingest::load_inputs(path)?;
            let [item] = ingested.items.as_slice() else {
                return Err(AppError::new(
                    2,
                    format!(
                        "'{}' holds {} inputs; use `batch` for more than one.",
                        path.display(),
                        ingested.items.len()
                    ),
                ));
            };
            pipeline::run_estimate_value(engine, &item.value)?
        }
        None => pipeline::run_estimate(engine, &args.to_input())?,
    };

    match mode.format {
        OutputFormat::Text => print!("{}", crate::report::format_estimate(&result)),
        OutputFormat::Json => println!("{}", to_json(&result, mode.pretty)?),
    }

    if let Some(path) = &args.output.export_json {
        crate::io::export::write_results_json(path, std::slice::from_ref(&result), mode.pretty)?;
    }

    Ok(())
}

fn handle_batch(engine: &EstimateEngine, args: BatchArgs, settings: &Settings) -> Result<(), AppError> {
    let mode = OutputMode::resolve(&args.output, settings);

    let ingested = crate::io::ingest::load_inputs(&args.input)?;
    let batch = pipeline::run_batch(engine, ingested);

    match mode.format {
        OutputFormat::Text => print!("{}", crate::report::format_batch_summary(&batch)),
        OutputFormat::Json => println!("{}", to_json(&batch_json(&batch), mode.pretty)?),
    }

    if let Some(path) = &args.export_csv {
        crate::io::export::write_results_csv(path, &batch.estimates)?;
    }
    if let Some(path) = &args.output.export_json {
        crate::io::export::write_results_json(path, &batch.estimates, mode.pretty)?;
    }

    if batch.estimates.is_empty() && !batch.rejected.is_empty() {
        return Err(AppError::new(2, "No input in the batch produced an estimate."));
    }
    Ok(())
}

fn handle_region(engine: &EstimateEngine, args: RegionArgs) -> Result<(), AppError> {
    let region = engine.resolver().resolve(&args.zip);
    println!("{}", crate::report::format_region(&args.zip, &region));
    Ok(())
}

fn batch_json(batch: &pipeline::BatchOutput) -> serde_json::Value {
    let rejected: Vec<_> = batch
        .rejected
        .iter()
        .map(|r| json!({"source": r.source, "error": r.error.to_string()}))
        .collect();
    let duplicates: Vec<_> = batch
        .duplicates
        .iter()
        .map(|d| json!({"source": d.source, "estimateId": d.estimate_id}))
        .collect();
    let skipped: Vec<_> = batch
        .row_errors
        .iter()
        .map(|e| json!({"line": e.line, "message": e.message}))
        .collect();
    json!({
        "estimates": batch.estimates,
        "rejected": rejected,
        "duplicates": duplicates,
        "skippedRows": skipped,
    })
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    encoded.map_err(|e| AppError::new(4, format!("Failed to encode JSON output: {e}")))
}
