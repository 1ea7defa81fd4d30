//! Text-generation service configuration.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

/// Default output token budget per completion.
const fn default_max_completion_tokens() -> u32 {
    10_000
}

/// Accepted sampling temperature range.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

/// A temperature that is not a number in [`TEMPERATURE_RANGE`] is dropped
/// with a warning and the model default applies.
fn deserialize_temperature<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let Some(raw) = Option::<Raw>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = match &raw {
        Raw::Number(value) => Some(*value),
        Raw::Text(text) if text.trim().is_empty() => return Ok(None),
        Raw::Text(text) => text.trim().parse::<f64>().ok(),
        Raw::Other(_) => None,
    };
    match parsed {
        Some(value) if TEMPERATURE_RANGE.contains(&value) => Ok(Some(value)),
        Some(value) => {
            tracing::warn!(value, "llm.temperature out of range, using model default");
            Ok(None)
        }
        None => {
            if let Raw::Text(text) = &raw {
                tracing::warn!(value = %text, "invalid llm.temperature, using model default");
            } else {
                tracing::warn!("invalid llm.temperature, using model default");
            }
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LlmConfig {
    /// Service base URL (e.g., `https://myresource.openai.azure.com`).
    #[serde(default)]
    pub endpoint: String,

    /// API key sent in the `api-key` header.
    #[serde(default)]
    pub api_key: String,

    /// Deployment (model) identifier.
    #[serde(default)]
    pub deployment: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Sampling temperature. Omitted from requests when unset.
    #[serde(default, deserialize_with = "deserialize_temperature")]
    pub temperature: Option<f64>,

    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: u32,

    /// Mirror every prompt and response to the log.
    #[serde(default)]
    pub debug: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: String::new(),
            api_version: default_api_version(),
            temperature: None,
            max_completion_tokens: default_max_completion_tokens(),
            debug: false,
        }
    }
}

impl LlmConfig {
    /// Endpoint, key, and deployment are all required for remote calls.
    /// Anything less puts the client in stub mode.
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.api_key.is_empty() && !self.deployment.is_empty()
    }
}
