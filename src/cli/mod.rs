//! Command-line parsing for the HVAC estimator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pricing code. Flags map onto `EstimateInput` fields one-to-one.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{EstimateInput, InstallationFactors, OutputFormat, Preferences};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hvac-est", version, about = "HVAC replacement cost estimator (Good / Better / Best)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price one home, from a JSON file or from flags.
    Estimate(EstimateArgs),
    /// Price every home in a JSON array or CSV file.
    Batch(BatchArgs),
    /// Show the regional cost band for a ZIP code.
    Region(RegionArgs),
}

/// Output options shared by the pricing commands.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Output format (defaults to HVAC_EST_FORMAT, else text).
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Emit compact JSON instead of pretty-printed JSON.
    #[arg(long)]
    pub compact: bool,

    /// Export result(s) to a JSON file.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct EstimateArgs {
    /// JSON file holding one input object. When given, the home flags are ignored.
    #[arg(short = 'i', long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// ZIP code used for regional pricing.
    #[arg(short = 'z', long)]
    pub zip: Option<String>,

    /// Conditioned square footage.
    #[arg(short = 's', long)]
    pub sqft: Option<f64>,

    /// Number of floors.
    #[arg(long, default_value_t = 1.0)]
    pub floors: f64,

    /// Home age bucket (older, newer, or anything else for neutral).
    #[arg(long)]
    pub home_age: Option<String>,

    /// Efficiency level (recorded in assumptions only).
    #[arg(long, default_value = "standard")]
    pub efficiency: String,

    /// System type (central-air, heat-pump, dual-fuel, furnace-only).
    #[arg(long, default_value = "central-air")]
    pub system: String,

    /// Smart thermostat / controls requested.
    #[arg(long)]
    pub smart: bool,

    /// Installation access difficulty (easy, average, difficult).
    #[arg(long)]
    pub access: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl EstimateArgs {
    /// Build an input from the home flags.
    pub fn to_input(&self) -> EstimateInput {
        EstimateInput {
            zip_code: self.zip.clone(),
            square_footage: self.sqft,
            floors: Some(self.floors),
            home_age: self.home_age.clone(),
            existing_system: None,
            preferences: Some(Preferences {
                efficiency_level: Some(self.efficiency.clone()),
                system_type: Some(self.system.clone()),
                smart_features: Some(self.smart),
            }),
            installation_factors: self.access.as_ref().map(|access| InstallationFactors {
                access_difficulty: Some(access.clone()),
                ..InstallationFactors::default()
            }),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Input file: a JSON array of inputs, or a CSV with one home per row.
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: PathBuf,

    /// Export unique estimates to CSV.
    #[arg(long = "export-csv", value_name = "PATH")]
    pub export_csv: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct RegionArgs {
    /// ZIP code to classify.
    pub zip: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_flags_build_input() {
        let cli = Cli::parse_from([
            "hvac-est", "estimate", "--zip", "90210", "--sqft", "2400", "--system", "heat-pump", "--smart",
            "--access", "difficult",
        ]);
        let Command::Estimate(args) = cli.command else {
            panic!("expected estimate command");
        };
        let input = args.to_input();
        assert_eq!(input.zip_code(), "90210");
        assert_eq!(input.square_footage, Some(2400.0));
        assert_eq!(input.system_type(), "heat-pump");
        assert_eq!(input.access_difficulty(), "difficult");
        assert_eq!(input.preferences.unwrap().smart_features, Some(true));
    }

    #[test]
    fn batch_requires_input() {
        assert!(Cli::try_parse_from(["hvac-est", "batch"]).is_err());
        let cli = Cli::try_parse_from(["hvac-est", "batch", "-i", "homes.csv", "--format", "json"]).unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch command");
        };
        assert_eq!(args.output.format, Some(OutputFormat::Json));
    }
}
