//! Good / Better / Best estimate engine.
//!
//! Pipeline for one input:
//!
//! 1. validate `squareFootage` and `preferences`
//! 2. compose the home multiplier (size, system type, access, age)
//! 3. scale the base tiers, floor them and enforce tier ordering
//! 4. scale by the ZIP code's regional multiplier, floor and re-order
//! 5. derive the deterministic estimate id and the assumptions text

pub mod generator;
pub mod multipliers;
pub mod tiers;

pub use generator::*;
pub use multipliers::HomeFactors;
pub use tiers::{TIER_GAP, apply_regional, price_home_tiers};
