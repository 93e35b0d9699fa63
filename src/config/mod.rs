//! Environment-driven settings.
//!
//! Values come from the process environment, after loading a `.env` file if one
//! exists. CLI flags take precedence over anything read here.
//!
//! | variable           | meaning                         | default |
//! |--------------------|---------------------------------|---------|
//! | `HVAC_EST_LOG`     | tracing filter (if no RUST_LOG) | `warn`  |
//! | `HVAC_EST_FORMAT`  | `text` or `json`                | `text`  |
//! | `HVAC_EST_PRETTY`  | pretty-print JSON output        | `true`  |

use crate::domain::OutputFormat;
use crate::error::AppError;

pub const ENV_LOG: &str = "HVAC_EST_LOG";
pub const ENV_FORMAT: &str = "HVAC_EST_FORMAT";
pub const ENV_PRETTY: &str = "HVAC_EST_PRETTY";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    pub format: OutputFormat,
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            format: OutputFormat::Text,
            pretty_json: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            settings.log_filter = filter;
        }

        if let Some(raw) = lookup(ENV_FORMAT) {
            settings.format = OutputFormat::parse(&raw).ok_or_else(|| {
                AppError::new(2, format!("Invalid {ENV_FORMAT} '{raw}' (expected text or json)."))
            })?;
        }

        if let Some(raw) = lookup(ENV_PRETTY) {
            settings.pretty_json = parse_bool(&raw).ok_or_else(|| {
                AppError::new(2, format!("Invalid {ENV_PRETTY} '{raw}' (expected true or false)."))
            })?;
        }

        Ok(settings)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let s = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn reads_all_variables() {
        let s = Settings::from_lookup(lookup_from(&[
            (ENV_LOG, "hvac_estimator=debug"),
            (ENV_FORMAT, "JSON"),
            (ENV_PRETTY, "off"),
        ]))
        .unwrap();
        assert_eq!(s.log_filter, "hvac_estimator=debug");
        assert_eq!(s.format, OutputFormat::Json);
        assert!(!s.pretty_json);
    }

    #[test]
    fn invalid_values_are_usage_errors() {
        let err = Settings::from_lookup(lookup_from(&[(ENV_FORMAT, "xml")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let err = Settings::from_lookup(lookup_from(&[(ENV_PRETTY, "maybe")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
