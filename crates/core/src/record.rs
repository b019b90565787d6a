//! Input Records
//!
//! Records arrive loosely typed: numeric fields may be JSON numbers or
//! strings, and severity may be missing or not a string at all. `Record`
//! keeps the caller's payload intact (it is written verbatim to the input
//! file for the external process), while `NormalizedRecord` is the strictly
//! typed view every analysis step works on.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{CoreError, CoreResult};

/// Severity used when a record carries no usable severity string.
pub const UNKNOWN_SEVERITY: &str = "unknown";

/// Record identifier as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// String identifier (e.g. a UUID)
    Text(String),
    /// Numeric identifier (e.g. a database row id)
    Number(Number),
    /// Anything else, including a missing id
    Other(Value),
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Other(Value::Null)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Text(s) => write!(f, "{}", s),
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Other(v) => write!(f, "{}", v),
        }
    }
}

/// A single input record (one detected pothole).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Caller-supplied identifier
    #[serde(default)]
    pub id: RecordId,
    /// Severity label, expected to be a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Value>,
    /// Number of resolution reports, number-like
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_count: Option<Value>,
    /// Latitude, number-like
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Value>,
    /// Longitude, number-like
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Value>,
    /// Fields this crate does not interpret (image_url, date, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Create a record with only an identifier.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the severity label
    pub fn with_severity(mut self, severity: impl Into<Value>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    /// Set the resolved count
    pub fn with_resolved_count(mut self, count: impl Into<Value>) -> Self {
        self.resolved_count = Some(count.into());
        self
    }

    /// Set the coordinates
    pub fn with_location(mut self, latitude: impl Into<Value>, longitude: impl Into<Value>) -> Self {
        self.latitude = Some(latitude.into());
        self.longitude = Some(longitude.into());
        self
    }

    /// Build a record from an arbitrary JSON value without failing.
    ///
    /// Objects are read field by field; any other value yields an empty
    /// record so that callers still see one record per input element.
    pub fn from_value_lossy(value: &Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => Record::default(),
        }
    }

    /// Coerce into the strictly typed view.
    pub fn normalize(&self) -> NormalizedRecord {
        NormalizedRecord {
            id: self.id.clone(),
            severity: to_severity_string(self.severity.as_ref()),
            resolved_reports: to_finite_number(self.resolved_count.as_ref()).unwrap_or(0.0),
            latitude: to_finite_number(self.latitude.as_ref()),
            longitude: to_finite_number(self.longitude.as_ref()),
        }
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        RecordId::Number(Number::from(value))
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(Number::from(value))
    }
}

/// Strictly typed record produced by coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub id: RecordId,
    pub severity: String,
    /// Always finite; 0 when absent or non-numeric
    pub resolved_reports: f64,
    /// `None` when absent or not a finite number
    pub latitude: Option<f64>,
    /// `None` when absent or not a finite number
    pub longitude: Option<f64>,
}

/// Coerce a number-like JSON value to a finite `f64`.
///
/// Numbers pass through, strings are trimmed and parsed. Empty strings,
/// non-finite results and every other JSON type yield `None`.
pub fn to_finite_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };

    number.is_finite().then_some(number)
}

/// Coerce a severity value to its tally key.
pub fn to_severity_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => UNKNOWN_SEVERITY.to_string(),
    }
}

/// Parse a records document.
///
/// Accepts either a bare JSON array of records or an object wrapping the
/// array under `potholes`.
pub fn parse_records(text: &str) -> CoreResult<Vec<Record>> {
    let document: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("potholes") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CoreError::validation(
                    "records object must contain a `potholes` array",
                ))
            }
        },
        _ => {
            return Err(CoreError::validation(
                "records document must be an array or an object with a `potholes` array",
            ))
        }
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(CoreError::from))
        .collect()
}
