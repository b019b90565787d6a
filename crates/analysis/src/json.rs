//! JSON Normalization and Parsing
//!
//! Parsing never fails loudly: callers chain several attempts and keep the
//! error text as a diagnostic.

use serde_json::Value;

/// Outcome of a single parse attempt. Exactly one side is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub value: Option<Value>,
    pub error: Option<String>,
}

impl ParseOutcome {
    fn parsed(value: Value) -> Self {
        Self {
            value: Some(value),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            value: None,
            error: Some(error.into()),
        }
    }

    /// Convert into a `Result`, keeping the error message.
    pub fn into_result(self) -> Result<Value, String> {
        match (self.value, self.error) {
            (Some(value), _) => Ok(value),
            (None, Some(error)) => Err(error),
            (None, None) => Err("Unknown JSON parse error".to_string()),
        }
    }
}

/// Strip one leading byte-order mark, then surrounding whitespace.
pub fn normalize_json_text(raw: &str) -> &str {
    raw.strip_prefix('\u{feff}').unwrap_or(raw).trim()
}

/// Parse `raw` as JSON after normalization.
pub fn safe_json_parse(raw: &str) -> ParseOutcome {
    match serde_json::from_str::<Value>(normalize_json_text(raw)) {
        Ok(value) => ParseOutcome::parsed(value),
        Err(e) => ParseOutcome::failed(e.to_string()),
    }
}
