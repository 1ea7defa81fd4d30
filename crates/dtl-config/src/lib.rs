//! # dtl-config
//!
//! Layered configuration loading for the DTL API using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DTL_*` prefix, `__` as separator)
//! 2. Project-level `.dtl/config.toml`
//! 3. User-level `~/.config/dtl/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DTL_LLM__API_KEY` -> `llm.api_key`, `DTL_DATABASE__URL` ->
//! `database.url`, etc. The `__` (double underscore) separates nested sections.
//!
//! # Usage
//!
//! ```no_run
//! use dtl_config::DtlConfig;
//!
//! let config = DtlConfig::load_with_dotenv().expect("config");
//! if !config.llm.is_configured() {
//!     println!("generation runs in stub mode");
//! }
//! ```

mod database;
mod error;
mod llm;
mod server;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use llm::{DEFAULT_API_VERSION, LlmConfig, TEMPERATURE_RANGE};
pub use server::{ANY_ORIGIN, ServerConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct DtlConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl DtlConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value fails
    /// validation (e.g. a zero token budget). A bad temperature is not an
    /// error; it is dropped with a warning.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".dtl/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DTL_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dtl").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.max_completion_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_completion_tokens".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
