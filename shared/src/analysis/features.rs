//! Feature extraction from log entries.

use crate::models::LogEntry;
use serde_json::Value;

/// Fields read from each entry, in feature-vector order.
pub const FEATURE_FIELDS: [&str; 3] = ["metric", "error_rate", "latency"];

/// Number of features per sample.
pub const FEATURE_COUNT: usize = FEATURE_FIELDS.len();

/// A single feature vector.
pub type Sample = [f64; FEATURE_COUNT];

/// Extracts the numeric feature vector of an entry.
///
/// Numbers are used as-is, numeric strings are parsed, booleans become 1 or 0.
/// Anything else, including a missing field, counts as 0.
#[must_use]
pub fn features(entry: &LogEntry) -> Sample {
    FEATURE_FIELDS.map(|field| entry.get(field).map_or(0.0, numeric_value))
}

fn numeric_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    }
}
