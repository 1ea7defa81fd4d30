//! Best-effort JSON extraction from model output.
//!
//! Models are asked for bare JSON but often wrap it in prose or a fenced
//! code block. [`extract_json`] tries a direct decode of the whole text, then
//! the first fenced block whose body is an object or array. Failure is a
//! value ([`JsonExtraction::NotFound`]), never an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*?\}|\[.*?\])\s*```").expect("fenced JSON pattern is valid")
});

/// Result of scanning model output for JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonExtraction {
    Decoded(Value),
    NotFound,
}

impl JsonExtraction {
    /// The decoded value when it is a JSON object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Decoded(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }
}

/// Extract a JSON value from `text`.
#[must_use]
pub fn extract_json(text: &str) -> JsonExtraction {
    if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        return JsonExtraction::Decoded(value);
    }

    for captures in FENCED_JSON.captures_iter(text) {
        if let Some(body) = captures.get(1) {
            if let Ok(value) = serde_json::from_str::<Value>(body.as_str()) {
                return JsonExtraction::Decoded(value);
            }
        }
    }

    JsonExtraction::NotFound
}

/// True unless `value` is null, an empty string, an empty array, or an
/// empty object.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Look up `key` in `map`, keeping it only if present.
#[must_use]
pub fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| is_present(v))
}

/// Look up `key` in `map` as a non-empty string.
#[must_use]
pub fn present_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}
