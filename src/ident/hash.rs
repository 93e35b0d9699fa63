//! Deterministic estimate ids.
//!
//! The id is a 32-bit rolling hash (`h = h * 31 + unit`, wrapping) over the
//! UTF-16 code units of the JSON-encoded normalized input, rendered in base 36
//! and fixed at 8 characters. It is not collision resistant and does not need to
//! be: it only has to be stable for equal inputs.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::domain::EstimateInput;

/// Length of the hash portion of an estimate id.
pub const HASH_LEN: usize = 8;

pub const ESTIMATE_ID_PREFIX: &str = "est-";

/// Pricing-relevant subset of an input, in a fixed field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInput {
    pub zip_code: String,
    pub square_footage: JsNumber,
    pub floors: JsNumber,
    pub home_age: String,
    pub efficiency_level: String,
    pub system_type: String,
    pub smart_features: bool,
}

impl NormalizedInput {
    pub fn from_input(input: &EstimateInput) -> Self {
        let prefs = input.preferences.as_ref();
        let trimmed = |s: Option<&str>| s.unwrap_or("").trim().to_string();
        Self {
            zip_code: trimmed(input.zip_code.as_deref()),
            square_footage: JsNumber(input.square_footage.unwrap_or(0.0)),
            floors: JsNumber(input.floors.unwrap_or(1.0)),
            home_age: trimmed(input.home_age.as_deref()),
            efficiency_level: trimmed(prefs.and_then(|p| p.efficiency_level.as_deref())),
            system_type: trimmed(prefs.and_then(|p| p.system_type.as_deref())),
            smart_features: prefs.and_then(|p| p.smart_features).unwrap_or(false),
        }
    }
}

/// A number rendered the way a browser's JSON stringifier renders it.
///
/// Integral values below `1e21` print as plain digits with no fractional part.
/// Other finite values use the shortest round-trip form. Non-finite values
/// become `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsNumber(pub f64);

/// Largest magnitude a browser still prints as plain integer digits.
const PLAIN_INTEGER_LIMIT: f64 = 1e21;

impl JsNumber {
    fn as_integer(self) -> Option<i128> {
        let v = self.0;
        (v.is_finite() && v.fract() == 0.0 && v.abs() < PLAIN_INTEGER_LIMIT).then_some(v as i128)
    }
}

impl Serialize for JsNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(i) => serializer.serialize_i128(i),
            None if self.0.is_finite() => serializer.serialize_f64(self.0),
            None => serializer.serialize_unit(),
        }
    }
}

impl fmt::Display for JsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_integer() {
            Some(i) => write!(f, "{i}"),
            None if self.0.is_finite() => write!(f, "{}", self.0),
            None => f.write_str("null"),
        }
    }
}

/// Rolling hash over UTF-16 code units.
pub fn rolling_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    })
}

/// Base-36 rendering of `|hash|`, zero-padded and cut to `HASH_LEN`.
pub fn hash_key(text: &str) -> String {
    let magnitude = i64::from(rolling_hash(text)).unsigned_abs();
    let digits = to_base36(magnitude);
    let padded = format!("{digits:0>width$}", width = HASH_LEN);
    padded.chars().take(HASH_LEN).collect()
}

pub fn to_base36(mut value: u64) -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// `est-` followed by the hash of the normalized input.
///
/// If the normalized input cannot be encoded the id degrades to a random key;
/// equal inputs then no longer share an id, but generation does not fail.
/// `NormalizedInput` holds only strings, a bool and `JsNumber`s, so with
/// `serde_json` this branch is not reached in practice.
pub fn estimate_id(input: &EstimateInput) -> String {
    id_from_encoded(serde_json::to_string(&NormalizedInput::from_input(input)))
}

fn id_from_encoded(encoded: Result<String, serde_json::Error>) -> String {
    let key = match encoded {
        Ok(json) => hash_key(&json),
        Err(err) => {
            warn!(error = %err, "failed to encode normalized input; using non-deterministic estimate id");
            super::fallback_key(HASH_LEN)
        }
    };
    format!("{ESTIMATE_ID_PREFIX}{key}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Preferences;

    #[test]
    fn rolling_hash_matches_known_values() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("a"), 97);
        assert_eq!(rolling_hash("ab"), 97 * 31 + 98);
        // "hello" is the classic 31-multiplier example: 99162322
        assert_eq!(rolling_hash("hello"), 99_162_322);
    }

    #[test]
    fn rolling_hash_wraps_instead_of_overflowing() {
        let long = "z".repeat(10_000);
        let _ = rolling_hash(&long);
    }

    #[test]
    fn hash_key_is_padded_to_fixed_length() {
        assert_eq!(hash_key(""), "00000000");
        assert_eq!(hash_key("a"), "0000002p");
        for text in ["x", "hello", "{\"zipCode\":\"10001\"}", "ünïcødé"] {
            let key = hash_key(text);
            assert_eq!(key.len(), HASH_LEN);
            assert!(key.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn base36_renders_digits_and_letters() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(2_147_483_648), "zik0zk");
    }

    #[test]
    fn js_number_drops_fraction_for_integers() {
        assert_eq!(JsNumber(2000.0).to_string(), "2000");
        assert_eq!(JsNumber(1500.5).to_string(), "1500.5");
        assert_eq!(JsNumber(f64::NAN).to_string(), "null");
        assert_eq!(serde_json::to_string(&JsNumber(2000.0)).unwrap(), "2000");
        assert_eq!(serde_json::to_string(&JsNumber(0.25)).unwrap(), "0.25");
        assert_eq!(serde_json::to_string(&JsNumber(f64::INFINITY)).unwrap(), "null");
    }

    #[test]
    fn js_number_keeps_plain_digits_up_to_1e21() {
        assert_eq!(serde_json::to_string(&JsNumber(1e15)).unwrap(), "1000000000000000");
        assert_eq!(serde_json::to_string(&JsNumber(1e20)).unwrap(), "100000000000000000000");
        assert_eq!(JsNumber(1e15).to_string(), "1000000000000000");
        assert_eq!(JsNumber(-3e18).to_string(), "-3000000000000000000");
    }

    #[test]
    fn unencodable_input_falls_back_to_random_key() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let id = id_from_encoded(Err(err));
        assert!(id.starts_with(ESTIMATE_ID_PREFIX));
        assert_eq!(id.len(), ESTIMATE_ID_PREFIX.len() + HASH_LEN);

        let encoded = id_from_encoded(Ok("hello".to_string()));
        assert_eq!(encoded, format!("{ESTIMATE_ID_PREFIX}{}", hash_key("hello")));
    }

    #[test]
    fn normalized_json_has_fixed_field_order() {
        let input = EstimateInput {
            zip_code: Some(" 10001 ".to_string()),
            square_footage: Some(2000.0),
            floors: None,
            home_age: Some("mid".to_string()),
            preferences: Some(Preferences {
                efficiency_level: Some("standard".to_string()),
                system_type: Some("central-air".to_string()),
                smart_features: Some(false),
            }),
            ..EstimateInput::default()
        };
        let json = serde_json::to_string(&NormalizedInput::from_input(&input)).unwrap();
        assert_eq!(
            json,
            r#"{"zipCode":"10001","squareFootage":2000,"floors":1,"homeAge":"mid","efficiencyLevel":"standard","systemType":"central-air","smartFeatures":false}"#
        );
    }

    #[test]
    fn estimate_id_ignores_non_pricing_fields() {
        let base = EstimateInput::new("10001", 2000.0);
        let mut with_extras = base.clone();
        with_extras.existing_system = Some(Default::default());
        with_extras.installation_factors = Some(Default::default());
        assert_eq!(estimate_id(&base), estimate_id(&with_extras));
    }

    #[test]
    fn estimate_id_trims_whitespace() {
        let a = EstimateInput::new("10001", 2000.0);
        let b = EstimateInput::new("  10001\t", 2000.0);
        assert_eq!(estimate_id(&a), estimate_id(&b));
        assert!(estimate_id(&a).starts_with(ESTIMATE_ID_PREFIX));
        assert_eq!(estimate_id(&a).len(), ESTIMATE_ID_PREFIX.len() + HASH_LEN);
    }

    #[test]
    fn estimate_id_changes_with_pricing_fields() {
        let a = EstimateInput::new("10001", 2000.0);
        let b = EstimateInput::new("10001", 2001.0);
        assert_ne!(estimate_id(&a), estimate_id(&b));
    }
}
