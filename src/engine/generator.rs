//! Estimate generation.
//!
//! `generate` is pure apart from the creation timestamp and the submission id.
//! Everything else (tiers, regional band, assumptions, estimate id) is a
//! function of the input alone.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{EstimateInput, EstimateResult, TierRange};
use crate::error::EstimateError;
use crate::ident::hash::JsNumber;
use crate::ident::{estimate_id, submission_id};
use crate::pricing::RegionalBandResolver;

use super::multipliers::HomeFactors;
use super::tiers::{TIER_GAP, apply_regional, price_home_tiers};

/// Schema version stamped on every result.
pub const ESTIMATE_VERSION: &str = "1.0";

/// Non-deterministic parts of a result.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub created_at: DateTime<Utc>,
    pub submission_id: String,
}

impl Stamp {
    pub fn now() -> Self {
        Self {
            created_at: Utc::now(),
            submission_id: submission_id(),
        }
    }
}

/// Tier-pricing engine.
#[derive(Debug, Clone, Default)]
pub struct EstimateEngine {
    resolver: RegionalBandResolver,
}

impl EstimateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(resolver: RegionalBandResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &RegionalBandResolver {
        &self.resolver
    }

    pub fn generate(&self, input: &EstimateInput) -> Result<EstimateResult, EstimateError> {
        self.generate_at(input, Stamp::now())
    }

    /// Validate and price raw JSON, e.g. a request body.
    ///
    /// Non-object values and fields of the wrong type are validation errors.
    pub fn generate_from_value(&self, value: &Value) -> Result<EstimateResult, EstimateError> {
        let input = parse_input(value)?;
        self.generate(&input)
    }

    pub fn generate_at(&self, input: &EstimateInput, stamp: Stamp) -> Result<EstimateResult, EstimateError> {
        let square_footage = validate(input)?;

        let factors = HomeFactors::from_input(input, square_footage);
        let home_multiplier = factors.combined();
        debug!(
            sqft = factors.sqft,
            system_type = factors.system_type,
            access = factors.access,
            age = factors.age,
            home_multiplier,
            "composed home multiplier"
        );

        let home_tiers = price_home_tiers(home_multiplier);
        let regional_band = self.resolver.resolve(input.zip_code());
        let tier_ranges = apply_regional(&home_tiers, regional_band.multiplier);

        let estimate_id = estimate_id(input);
        check_invariants(&estimate_id, &tier_ranges)?;

        Ok(EstimateResult {
            estimate_id,
            input: input.clone(),
            tier_ranges,
            regional_band,
            assumptions: assumptions(input, square_footage),
            created_at: stamp.created_at,
            version: ESTIMATE_VERSION.to_string(),
            submission_id: stamp.submission_id,
        })
    }
}

/// Convenience wrapper around a default engine.
pub fn generate_estimate(input: &EstimateInput) -> Result<EstimateResult, EstimateError> {
    EstimateEngine::default().generate(input)
}

/// Deserialize an input leniently: the value must be a JSON object, but any
/// field may be missing. Only `squareFootage` and `preferences` can make a
/// present field fail; other fields of the wrong type fall back to defaults.
pub fn parse_input(value: &Value) -> Result<EstimateInput, EstimateError> {
    if !value.is_object() {
        return Err(EstimateError::validation("input must be a JSON object"));
    }
    if !matches!(value.get("preferences"), None | Some(Value::Null | Value::Object(_))) {
        return Err(EstimateError::validation("preferences must be an object"));
    }
    EstimateInput::deserialize(value)
        .map_err(|e| EstimateError::validation(format!("malformed input: {e}")))
}

/// Returns the validated square footage.
fn validate(input: &EstimateInput) -> Result<f64, EstimateError> {
    let square_footage = match input.square_footage {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            return Err(EstimateError::validation(format!(
                "squareFootage must be a number > 0 (got {v})"
            )));
        }
        None => return Err(EstimateError::validation("squareFootage is required")),
    };
    if input.preferences.is_none() {
        return Err(EstimateError::validation("preferences is required"));
    }
    Ok(square_footage)
}

fn check_invariants(estimate_id: &str, tiers: &TierRange) -> Result<(), EstimateError> {
    if estimate_id.is_empty() {
        return Err(EstimateError::generation("estimate id is empty"));
    }
    if !tiers.is_strictly_ordered(TIER_GAP) || tiers.good.min <= 0 {
        return Err(EstimateError::generation(format!(
            "tier ranges violate ordering: {:?}",
            tiers.bounds()
        )));
    }
    Ok(())
}

/// Human-readable notes shown next to the estimate.
///
/// The installation line is fixed text: it does not reflect the access
/// difficulty that was priced in.
fn assumptions(input: &EstimateInput, square_footage: f64) -> Vec<String> {
    vec![
        format!("Based on {} sq ft home", JsNumber(square_footage)),
        format!("{} efficiency equipment", input.efficiency_level()),
        "Standard installation complexity".to_string(),
        format!("Regional pricing for ZIP code {}", input.zip_code()),
    ]
}
