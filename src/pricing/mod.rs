//! Regional pricing.

pub mod regional;

pub use regional::{RegionalBandResolver, resolve, zip_prefix};
