//! Home-factor multipliers.
//!
//! Each factor maps one input attribute to a dimensionless scalar. Unknown or
//! missing values are neutral (1.0) so the engine never rejects an input for an
//! unrecognized option string.

use crate::domain::EstimateInput;

/// Square footage of the reference home the base tiers are priced for.
pub const BASELINE_SQFT: f64 = 2000.0;

pub const SQFT_MULTIPLIER_MIN: f64 = 0.8;
pub const SQFT_MULTIPLIER_MAX: f64 = 2.0;

/// `square_footage / 2000`, clamped to `[0.8, 2.0]`.
pub fn sqft_multiplier(square_footage: f64) -> f64 {
    (square_footage / BASELINE_SQFT).clamp(SQFT_MULTIPLIER_MIN, SQFT_MULTIPLIER_MAX)
}

pub fn system_type_multiplier(system_type: &str) -> f64 {
    match system_type {
        "heat-pump" => 1.2,
        "dual-fuel" => 1.3,
        _ => 1.0,
    }
}

pub fn access_multiplier(access_difficulty: &str) -> f64 {
    match access_difficulty {
        "difficult" => 1.15,
        "average" => 1.08,
        _ => 1.0,
    }
}

pub fn age_multiplier(home_age: &str) -> f64 {
    match home_age {
        "older" => 1.1,
        "newer" => 0.95,
        _ => 1.0,
    }
}

/// The four home factors and their product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeFactors {
    pub sqft: f64,
    pub system_type: f64,
    pub access: f64,
    pub age: f64,
}

impl HomeFactors {
    /// Derive factors from an input whose square footage has already been
    /// validated as positive.
    pub fn from_input(input: &EstimateInput, square_footage: f64) -> Self {
        Self {
            sqft: sqft_multiplier(square_footage),
            system_type: system_type_multiplier(input.system_type()),
            access: access_multiplier(input.access_difficulty()),
            age: age_multiplier(input.home_age()),
        }
    }

    /// Product in a fixed order (sqft, system, access, age) so the floating
    /// point result is reproducible.
    pub fn combined(&self) -> f64 {
        self.sqft * self.system_type * self.access * self.age
    }
}
