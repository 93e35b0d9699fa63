//! Shared domain types.
//!
//! These types are kept serializable with the same camelCase field names the web
//! front-end sends, so an input captured from the wizard can be replayed through
//! the CLI verbatim and a result can be served back as JSON unchanged.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Home description supplied by the caller.
///
/// Every field is optional at the type level. Required fields (`squareFootage`,
/// `preferences`) are checked by the engine so that a missing field surfaces as a
/// validation error instead of a deserialization failure. Optional fields of the
/// wrong JSON type are read as absent and take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateInput {
    #[serde(default, deserialize_with = "lenient")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub square_footage: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub floors: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub home_age: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub existing_system: Option<ExistingSystem>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub installation_factors: Option<InstallationFactors>,
}

impl EstimateInput {
    /// Minimal valid input: a ZIP code, a square footage and default preferences.
    pub fn new(zip_code: impl Into<String>, square_footage: f64) -> Self {
        Self {
            zip_code: Some(zip_code.into()),
            square_footage: Some(square_footage),
            floors: Some(1.0),
            preferences: Some(Preferences::default()),
            ..Self::default()
        }
    }

    pub fn zip_code(&self) -> &str {
        self.zip_code.as_deref().unwrap_or("")
    }

    pub fn home_age(&self) -> &str {
        self.home_age.as_deref().unwrap_or("")
    }

    /// Declared system type, `central-air` when absent.
    pub fn system_type(&self) -> &str {
        self.preferences
            .as_ref()
            .and_then(|p| p.system_type.as_deref())
            .unwrap_or("central-air")
    }

    /// Declared efficiency level, `standard` when absent.
    pub fn efficiency_level(&self) -> &str {
        self.preferences
            .as_ref()
            .and_then(|p| p.efficiency_level.as_deref())
            .unwrap_or("standard")
    }

    /// Declared access difficulty, `easy` when absent.
    pub fn access_difficulty(&self) -> &str {
        self.installation_factors
            .as_ref()
            .and_then(|f| f.access_difficulty.as_deref())
            .unwrap_or("easy")
    }
}

/// Equipment already installed in the home. Carried through, not priced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingSystem {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub has_existing: bool,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub system_type: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub system_age: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Homeowner equipment preferences.
///
/// Only `systemType` affects price. `efficiencyLevel` is echoed into the
/// assumptions text and `smartFeatures` only feeds the estimate id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, deserialize_with = "lenient")]
    pub efficiency_level: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub system_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub smart_features: Option<bool>,
}

/// Site conditions. Only `accessDifficulty` affects price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationFactors {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub access_difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub permits: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

/// Read an optional field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}

/// A price band in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl PriceRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

/// Good / Better / Best price bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRange {
    pub good: PriceRange,
    pub better: PriceRange,
    pub best: PriceRange,
}

impl TierRange {
    /// Bounds in ascending tier order: good.min, good.max, better.min, ...
    pub fn bounds(&self) -> [i64; 6] {
        [
            self.good.min,
            self.good.max,
            self.better.min,
            self.better.max,
            self.best.min,
            self.best.max,
        ]
    }

    /// True when every bound exceeds the previous one by at least `gap`.
    pub fn is_strictly_ordered(&self, gap: i64) -> bool {
        self.bounds().windows(2).all(|w| w[1] - w[0] >= gap)
    }

    pub fn tiers(&self) -> [(Tier, PriceRange); 3] {
        [
            (Tier::Good, self.good),
            (Tier::Better, self.better),
            (Tier::Best, self.best),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Good,
    Better,
    Best,
}

impl Tier {
    pub fn display_name(self) -> &'static str {
        match self {
            Tier::Good => "Good",
            Tier::Better => "Better",
            Tier::Best => "Best",
        }
    }
}

/// Coarse installation-cost region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionalBand {
    Low,
    Average,
    High,
}

impl RegionalBand {
    pub const ALL: [RegionalBand; 3] = [RegionalBand::Low, RegionalBand::Average, RegionalBand::High];

    pub fn multiplier(self) -> f64 {
        match self {
            RegionalBand::Low => 0.85,
            RegionalBand::Average => 1.0,
            RegionalBand::High => 1.25,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RegionalBand::Low => "Lower-cost region",
            RegionalBand::Average => "Average-cost region",
            RegionalBand::High => "Higher-cost region",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegionalBand::Low => "low",
            RegionalBand::Average => "average",
            RegionalBand::High => "high",
        }
    }
}

/// Resolved regional adjustment for a ZIP code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalMultiplier {
    pub band: RegionalBand,
    pub multiplier: f64,
    pub label: String,
}

impl From<RegionalBand> for RegionalMultiplier {
    fn from(band: RegionalBand) -> Self {
        Self {
            band,
            multiplier: band.multiplier(),
            label: band.label().to_string(),
        }
    }
}

/// A generated estimate.
///
/// `estimate_id` is derived from the pricing-relevant input fields and is the
/// only key to use for lookups or deduplication. `submission_id` is time/random
/// based bookkeeping and differs on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub estimate_id: String,
    pub input: EstimateInput,
    pub tier_ranges: TierRange,
    pub regional_band: RegionalMultiplier,
    pub assumptions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub version: String,
    #[serde(rename = "_submissionId")]
    pub submission_id: String,
}

/// Output rendering for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_deserializes_camel_case_fields() {
        let json = r#"{
            "zipCode": "10001",
            "squareFootage": 2000,
            "floors": 2,
            "homeAge": "older",
            "preferences": {"efficiencyLevel": "high", "systemType": "heat-pump", "smartFeatures": true},
            "installationFactors": {"accessDifficulty": "difficult"}
        }"#;
        let input: EstimateInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.zip_code(), "10001");
        assert_eq!(input.square_footage, Some(2000.0));
        assert_eq!(input.system_type(), "heat-pump");
        assert_eq!(input.access_difficulty(), "difficult");
        assert_eq!(input.efficiency_level(), "high");
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let input: EstimateInput =
            serde_json::from_str(r#"{"squareFootage": 1800, "preferences": {}}"#).unwrap();
        assert_eq!(input.zip_code(), "");
        assert_eq!(input.system_type(), "central-air");
        assert_eq!(input.access_difficulty(), "easy");
        assert_eq!(input.efficiency_level(), "standard");
        assert!(input.existing_system.is_none());
    }

    #[test]
    fn wrongly_typed_optional_fields_read_as_absent() {
        let json = r#"{
            "zipCode": 10001,
            "squareFootage": 1800,
            "floors": "2",
            "homeAge": 40,
            "preferences": {"efficiencyLevel": 1, "systemType": "heat-pump", "smartFeatures": "yes"},
            "existingSystem": {"hasExisting": "yes", "systemAge": 12, "condition": "fair"},
            "installationFactors": {"accessDifficulty": "average", "permits": "no", "timeline": 3}
        }"#;
        let input: EstimateInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.zip_code, None);
        assert_eq!(input.floors, None);
        assert_eq!(input.home_age, None);
        assert_eq!(input.square_footage, Some(1800.0));
        assert_eq!(input.system_type(), "heat-pump");
        assert_eq!(input.efficiency_level(), "standard");
        assert_eq!(input.preferences.as_ref().unwrap().smart_features, None);

        let existing = input.existing_system.as_ref().unwrap();
        assert!(!existing.has_existing);
        assert_eq!(existing.system_age, None);
        assert_eq!(existing.condition.as_deref(), Some("fair"));

        let factors = input.installation_factors.as_ref().unwrap();
        assert_eq!(input.access_difficulty(), "average");
        assert_eq!(factors.permits, None);
        assert_eq!(factors.timeline, None);
    }

    #[test]
    fn square_footage_keeps_strict_typing() {
        assert!(serde_json::from_str::<EstimateInput>(r#"{"squareFootage": "big"}"#).is_err());
    }

    #[test]
    fn tier_ordering_check_respects_gap() {
        let tiers = TierRange {
            good: PriceRange::new(5000, 7500),
            better: PriceRange::new(8000, 11000),
            best: PriceRange::new(11500, 16000),
        };
        assert!(tiers.is_strictly_ordered(500));
        assert!(!tiers.is_strictly_ordered(501));
    }

    #[test]
    fn regional_band_serializes_lowercase() {
        let m = RegionalMultiplier::from(RegionalBand::High);
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains(r#""band":"high""#));
        assert!(json.contains("1.25"));
    }

    #[test]
    fn submission_id_uses_underscore_field_name() {
        let result = EstimateResult {
            estimate_id: "est-00000abc".to_string(),
            input: EstimateInput::new("10001", 2000.0),
            tier_ranges: TierRange {
                good: PriceRange::new(1, 2),
                better: PriceRange::new(3, 4),
                best: PriceRange::new(5, 6),
            },
            regional_band: RegionalBand::Average.into(),
            assumptions: vec![],
            created_at: Utc::now(),
            version: "1.0".to_string(),
            submission_id: "sub-1-abc".to_string(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""_submissionId":"sub-1-abc""#));
        assert!(json.contains(r#""estimateId":"est-00000abc""#));
        assert!(json.contains(r#""tierRanges""#));
    }
}
