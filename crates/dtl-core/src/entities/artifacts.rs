//! Singleton artifacts attached to a unit.
//!
//! These types are both the persisted shape and the save payload: a unit has
//! at most one of each, and saving overwrites in place.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOGIC_LANGUAGE: &str = "Python";

/// OWL-like ontology text for a unit, plus the model output it came from.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Ontology {
    pub ontology_owl: String,
    #[serde(default)]
    pub raw_response: Option<String>,
}

/// Structured function signature for a unit's law function.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Interface {
    pub function_name: String,
    /// Ordered input descriptors (typically `{name, type, description}` objects).
    pub inputs: Vec<serde_json::Value>,
    /// Ordered output descriptors.
    pub outputs: Vec<serde_json::Value>,
    #[serde(default)]
    pub mcp_spec: Option<serde_json::Value>,
}

/// OWL-like text capturing numeric thresholds and parameters.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Configuration {
    pub configuration_owl: String,
}

/// Generated source implementing the unit's legal rule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Logic {
    #[serde(default = "default_language")]
    pub language: String,
    pub code: String,
}

fn default_language() -> String {
    DEFAULT_LOGIC_LANGUAGE.to_string()
}
