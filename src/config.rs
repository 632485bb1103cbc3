//! Configuration for sentiview
//!
//! Values are layered, later sources winning:
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `<config dir>/sentiview/config.toml` if present)
//! 3. `SENTIVIEW_*` environment variables, e.g. `SENTIVIEW_API_BASE_URL`
//! 4. Command-line overrides applied by the binary

use crate::aggregation::FrequencyPolicy;
use crate::error::{Result, SentiviewError};
use crate::prediction::client::DEFAULT_TIMEOUT_SECS;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable prefix
const ENV_PREFIX: &str = "SENTIVIEW";

/// Default prediction service address
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentiviewConfig {
    /// Root URL of the prediction service
    pub api_base_url: String,

    /// Per-request timeout, in seconds
    pub request_timeout_secs: u64,

    /// Local aggregate store file
    pub store_path: PathBuf,

    /// Word-frequency accumulation policy
    pub frequency_policy: FrequencyPolicy,
}

impl Default for SentiviewConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            store_path: default_store_path(),
            frequency_policy: FrequencyPolicy::default(),
        }
    }
}

/// Get the default store path using the XDG data directory
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sentiview")
        .join("aggregates.json")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sentiview")
        .join("config.toml")
}

impl SentiviewConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let file_source = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::from(default_config_path()).required(false),
        };

        let settings = Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default(
                "store_path",
                defaults.store_path.to_string_lossy().to_string(),
            )?
            .set_default("frequency_policy", defaults.frequency_policy.to_string())?
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: SentiviewConfig = settings.try_deserialize()?;
        config.validate()?;

        debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Load configuration from a TOML string, without other sources
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: SentiviewConfig = toml::from_str(toml_str)
            .map_err(|e| config_error(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(config_error("api_base_url cannot be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(config_error(format!(
                "api_base_url must start with http:// or https:// (got {})",
                url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(config_error("request_timeout_secs must be at least 1"));
        }

        if self.store_path.as_os_str().is_empty() {
            return Err(config_error("store_path cannot be empty"));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| config_error(e.to_string()))
    }
}

fn config_error(message: impl Into<String>) -> SentiviewError {
    SentiviewError::Config(config::ConfigError::Message(message.into()))
}
