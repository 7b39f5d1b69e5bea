//! Log data model.
//!
//! A `LogEntry` is an opaque JSON object. No schema is enforced beyond the
//! document being a well-formed object; the entry is decoded from request
//! bytes, re-encoded to a canonical form, and handed to the queue.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while decoding a log entry.
#[derive(Debug, Error)]
pub enum LogDecodeError {
    /// The payload is not valid JSON (syntax error, truncation, empty body).
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The payload is valid JSON but not an object.
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

impl LogDecodeError {
    /// Short machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => "invalid_json",
            Self::NotAnObject(_) => "not_an_object",
        }
    }
}

/// A single log event: string keys mapped to arbitrary JSON values.
///
/// # Example
///
/// ```
/// use shared::models::LogEntry;
///
/// let entry = LogEntry::from_slice(br#"{"msg":"disk full","level":"error"}"#).unwrap();
/// assert_eq!(entry.get("level").and_then(|v| v.as_str()), Some("error"));
///
/// // Canonical form is compact with sorted keys.
/// assert_eq!(entry.to_bytes().unwrap(), br#"{"level":"error","msg":"disk full"}"#.to_vec());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntry {
    fields: Map<String, Value>,
}

impl LogEntry {
    /// Creates an empty log entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a log entry from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LogDecodeError::InvalidJson`] if the bytes are not a JSON
    /// document and [`LogDecodeError::NotAnObject`] if the document is not an
    /// object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LogDecodeError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::try_from(value)
    }

    /// Encodes the entry in canonical form (compact JSON, sorted keys).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.fields)
    }

    /// Sets a field, returning the modified entry.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the entry has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the underlying field map.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Converts the entry into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Value> for LogEntry {
    type Error = LogDecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Array(_) => Err(LogDecodeError::NotAnObject("array")),
            Value::String(_) => Err(LogDecodeError::NotAnObject("string")),
            Value::Number(_) => Err(LogDecodeError::NotAnObject("number")),
            Value::Bool(_) => Err(LogDecodeError::NotAnObject("boolean")),
            Value::Null => Err(LogDecodeError::NotAnObject("null")),
        }
    }
}

impl From<Map<String, Value>> for LogEntry {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
