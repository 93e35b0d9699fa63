//! `hvac-estimator` library crate.
//!
//! The binary (`hvac-est`) is a thin wrapper around this library so that:
//!
//! - pricing logic is testable without spawning processes
//! - the engine can be embedded behind a web endpoint unchanged
//! - code stays easy to navigate as the project grows
//!
//! The pricing core is `engine` (tier math and estimate assembly), `pricing`
//! (ZIP-prefix regional bands) and `ident` (estimate / submission ids). It is
//! synchronous, holds no shared mutable state and is safe to call from any
//! number of threads.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ident;
pub mod io;
pub mod pricing;
pub mod report;
pub mod store;

pub use domain::{EstimateInput, EstimateResult, RegionalBand, RegionalMultiplier, TierRange};
pub use engine::{EstimateEngine, generate_estimate};
pub use error::{AppError, EstimateError};
pub use pricing::RegionalBandResolver;
