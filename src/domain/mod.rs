//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the caller-supplied home description (`EstimateInput` and its parts)
//! - pricing outputs (`TierRange`, `RegionalMultiplier`, `EstimateResult`)
//! - CLI-facing enums (`OutputFormat`)

pub mod types;

pub use types::*;
