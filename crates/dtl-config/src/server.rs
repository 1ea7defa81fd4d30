//! HTTP server configuration.

use serde::{Deserialize, Deserializer, Serialize};

/// Origin value that allows every origin.
pub const ANY_ORIGIN: &str = "*";

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_cors_allow_origins() -> Vec<String> {
    vec![ANY_ORIGIN.to_string()]
}

/// Accept either a list or a comma-separated string (`DTL_SERVER__CORS_ALLOW_ORIGINS=a,b`).
fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Origins {
        One(String),
        Many(Vec<String>),
    }

    let raw = match Origins::deserialize(deserializer)? {
        Origins::One(joined) => joined.split(',').map(str::to_string).collect(),
        Origins::Many(list) => list,
    };
    let origins: Vec<String> = raw
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();
    if origins.iter().any(|origin| origin == ANY_ORIGIN) {
        return Ok(default_cors_allow_origins());
    }
    Ok(origins)
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Path prefix for every Resource API route.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Browser origins allowed to call the API. `["*"]` allows any origin;
    /// an empty list disables cross-origin access.
    #[serde(
        default = "default_cors_allow_origins",
        deserialize_with = "deserialize_origins"
    )]
    pub cors_allow_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            api_prefix: default_api_prefix(),
            cors_allow_origins: default_cors_allow_origins(),
        }
    }
}

impl ServerConfig {
    /// The prefix with a leading slash and no trailing slash.
    ///
    /// Returns an empty string when routes should be mounted at the root.
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }

    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allow_origins.iter().any(|origin| origin == ANY_ORIGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_normalization() {
        let cases = [
            ("/api", "/api"),
            ("api", "/api"),
            ("/api/", "/api"),
            ("/", ""),
            ("", ""),
            ("v1/dtl/", "/v1/dtl"),
        ];
        for (raw, expected) in cases {
            let config = ServerConfig {
                api_prefix: raw.into(),
                ..Default::default()
            };
            assert_eq!(config.normalized_prefix(), expected, "prefix {raw:?}");
        }
    }

    #[test]
    fn cors_origins_accept_list_or_joined_string() {
        let joined: ServerConfig = serde_json::from_value(serde_json::json!({
            "cors_allow_origins": "http://localhost:4173, https://dtl.example.org,"
        }))
        .unwrap();
        assert_eq!(
            joined.cors_allow_origins,
            vec!["http://localhost:4173", "https://dtl.example.org"]
        );
        assert!(!joined.allows_any_origin());

        let wildcard: ServerConfig =
            serde_json::from_value(serde_json::json!({"cors_allow_origins": ["*", "http://a"]}))
                .unwrap();
        assert_eq!(wildcard.cors_allow_origins, vec!["*"]);
        assert!(ServerConfig::default().allows_any_origin());
    }

    #[test]
    fn default_bind_is_loopback() {
        assert_eq!(ServerConfig::default().bind, "127.0.0.1:8000");
    }
}
