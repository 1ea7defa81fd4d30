//! Persistence configuration.

use serde::{Deserialize, Serialize};

fn default_url() -> String {
    "dtl.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Local file path, `file:` URL, or `libsql://` / `https://` remote URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Auth token for remote databases. Ignored for local files.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_remote(&self) -> bool {
        ["libsql://", "https://", "http://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }

    /// Filesystem path for a local database, with any `file:` prefix removed.
    pub fn local_path(&self) -> &str {
        self.url.strip_prefix("file:").unwrap_or(&self.url)
    }
}
