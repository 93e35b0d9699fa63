//! Input ingest for single and batch estimates.
//!
//! Two file formats are accepted, chosen by extension:
//!
//! - `.json`: one input object, or an array of input objects (the same shape the
//!   web wizard posts)
//! - `.csv`: one home per row with snake_case columns (see `CSV_COLUMNS`)
//!
//! Both are turned into raw JSON objects. Field-level validation is left to the
//! engine so a batch reports exactly the same errors a single request would.
//! CSV rows that cannot even be converted (a non-numeric `square_footage`, say)
//! are skipped and reported as `RowError`s.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::AppError;

/// Recognized CSV columns. Only `square_footage` is required in the header.
pub const CSV_COLUMNS: [&str; 8] = [
    "zip_code",
    "square_footage",
    "floors",
    "home_age",
    "efficiency_level",
    "system_type",
    "smart_features",
    "access_difficulty",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(InputFormat::Json),
            Some("csv") => Ok(InputFormat::Csv),
            _ => Err(AppError::new(
                2,
                format!("Unsupported input file '{}' (expected .json or .csv).", path.display()),
            )),
        }
    }
}

/// One raw input and where it came from (for error reporting).
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedItem {
    pub source: String,
    pub value: Value,
}

/// A row-level error encountered during CSV ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct IngestedInputs {
    pub items: Vec<IngestedItem>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load inputs from a `.json` or `.csv` file.
pub fn load_inputs(path: &Path) -> Result<IngestedInputs, AppError> {
    let format = InputFormat::from_path(path)?;
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open input '{}': {e}", path.display())))?;
    match format {
        InputFormat::Json => read_json_inputs(file),
        InputFormat::Csv => read_csv_inputs(file),
    }
}

pub fn read_json_inputs<R: Read>(reader: R) -> Result<IngestedInputs, AppError> {
    let value: Value =
        serde_json::from_reader(reader).map_err(|e| AppError::new(2, format!("Invalid input JSON: {e}")))?;

    let items: Vec<IngestedItem> = match value {
        Value::Array(values) => values
            .into_iter()
            .enumerate()
            .map(|(i, value)| IngestedItem {
                source: format!("item {}", i + 1),
                value,
            })
            .collect(),
        other => vec![IngestedItem {
            source: "item 1".to_string(),
            value: other,
        }],
    };

    Ok(IngestedInputs {
        rows_read: items.len(),
        items,
        row_errors: Vec::new(),
    })
}

pub fn read_csv_inputs<R: Read>(reader: R) -> Result<IngestedInputs, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV header: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    if !header_map.contains_key("square_footage") {
        return Err(AppError::new(2, "CSV is missing required column 'square_footage'."));
    }

    let mut out = IngestedInputs::default();
    for (idx, record) in rdr.records().enumerate() {
        out.rows_read += 1;
        // Header is line 1.
        let fallback_line = idx + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                out.row_errors.push(RowError {
                    line: fallback_line,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        match row_to_value(&record, &header_map) {
            Ok(value) => out.items.push(IngestedItem {
                source: format!("line {line}"),
                value,
            }),
            Err(message) => out.row_errors.push(RowError { line, message }),
        }
    }

    for err in &out.row_errors {
        warn!(line = err.line, message = %err.message, "skipped CSV row");
    }

    Ok(out)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

fn field<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    header_map
        .get(name)
        .and_then(|&i| record.get(i))
        .filter(|v| !v.is_empty())
}

fn parse_number(raw: &str, column: &str) -> Result<f64, String> {
    raw.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{column} '{raw}' is not a number"))
}

fn parse_flag(raw: &str, column: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        _ => Err(format!("{column} '{raw}' is not a boolean")),
    }
}

/// Convert one CSV row into the camelCase JSON shape of `EstimateInput`.
///
/// A row always carries a `preferences` object, so the only required field
/// that can still be missing is `squareFootage`.
fn row_to_value(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Value, String> {
    let get = |name: &str| field(record, header_map, name);

    let mut input = Map::new();
    if let Some(zip) = get("zip_code") {
        input.insert("zipCode".into(), Value::from(zip));
    }
    if let Some(raw) = get("square_footage") {
        input.insert("squareFootage".into(), Value::from(parse_number(raw, "square_footage")?));
    }
    if let Some(raw) = get("floors") {
        input.insert("floors".into(), Value::from(parse_number(raw, "floors")?));
    }
    if let Some(age) = get("home_age") {
        input.insert("homeAge".into(), Value::from(age));
    }

    let mut prefs = Map::new();
    if let Some(level) = get("efficiency_level") {
        prefs.insert("efficiencyLevel".into(), Value::from(level));
    }
    if let Some(system) = get("system_type") {
        prefs.insert("systemType".into(), Value::from(system));
    }
    if let Some(raw) = get("smart_features") {
        prefs.insert("smartFeatures".into(), Value::from(parse_flag(raw, "smart_features")?));
    }
    input.insert("preferences".into(), Value::Object(prefs));

    if let Some(access) = get("access_difficulty") {
        let mut factors = Map::new();
        factors.insert("accessDifficulty".into(), Value::from(access));
        input.insert("installationFactors".into(), Value::Object(factors));
    }

    Ok(Value::Object(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_single_object_is_one_item() {
        let data = br#"{"zipCode": "10001", "squareFootage": 2000, "preferences": {}}"#;
        let ingested = read_json_inputs(&data[..]).unwrap();
        assert_eq!(ingested.items.len(), 1);
        assert_eq!(ingested.items[0].source, "item 1");
        assert_eq!(ingested.items[0].value["zipCode"], "10001");
    }

    #[test]
    fn json_array_keeps_invalid_items_for_the_engine() {
        let data = br#"[{"squareFootage": 2000, "preferences": {}}, 42, {}]"#;
        let ingested = read_json_inputs(&data[..]).unwrap();
        assert_eq!(ingested.items.len(), 3);
        assert_eq!(ingested.items[1].value, json!(42));
        assert_eq!(ingested.items[2].source, "item 3");
    }

    #[test]
    fn malformed_json_is_an_input_error() {
        let err = read_json_inputs(&b"{not json"[..]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn csv_rows_become_camel_case_objects() {
        let data = "\
zip_code,square_footage,floors,home_age,efficiency_level,system_type,smart_features,access_difficulty
90210,\"2,400\",2,older,high,heat-pump,yes,difficult
10001,1800,,,,,,
";
        let ingested = read_csv_inputs(data.as_bytes()).unwrap();
        assert!(ingested.row_errors.is_empty());
        assert_eq!(ingested.rows_read, 2);
        assert_eq!(
            ingested.items[0].value,
            json!({
                "zipCode": "90210",
                "squareFootage": 2400.0,
                "floors": 2.0,
                "homeAge": "older",
                "preferences": {"efficiencyLevel": "high", "systemType": "heat-pump", "smartFeatures": true},
                "installationFactors": {"accessDifficulty": "difficult"}
            })
        );
        assert_eq!(
            ingested.items[1].value,
            json!({"zipCode": "10001", "squareFootage": 1800.0, "preferences": {}})
        );
        assert_eq!(ingested.items[1].source, "line 3");
    }

    #[test]
    fn csv_bad_rows_are_skipped_and_reported() {
        let data = "\
square_footage,smart_features
abc,
2000,maybe
2000,no
";
        let ingested = read_csv_inputs(data.as_bytes()).unwrap();
        assert_eq!(ingested.rows_read, 3);
        assert_eq!(ingested.items.len(), 1);
        assert_eq!(ingested.row_errors.len(), 2);
        assert_eq!(ingested.row_errors[0].line, 2);
        assert!(ingested.row_errors[0].message.contains("square_footage"));
        assert_eq!(ingested.row_errors[1].line, 3);
    }

    #[test]
    fn csv_requires_square_footage_column() {
        let err = read_csv_inputs("zip_code\n10001\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn format_is_chosen_by_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.JSON")).unwrap(), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("b.csv")).unwrap(), InputFormat::Csv);
        assert!(InputFormat::from_path(Path::new("c.txt")).is_err());
    }
}
