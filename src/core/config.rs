//! Configuration management
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional `aura.{toml,json,yaml}` file (or an explicit path), then
//! `AURA_*` environment variables. `GEMINI_API_KEY` is honoured when no key
//! was configured otherwise.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};
use crate::core::interaction::SettingsSource;

/// Default Gemini REST base URL
pub const DEFAULT_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for every translation unless overridden
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Environment prefix for configuration overrides
const ENV_PREFIX: &str = "AURA";

/// Fallback environment variable for the key
const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

/// Configuration for the code translator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraConfig {
    /// Gemini API key, empty when unset
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// REST base URL
    pub api_endpoint: String,
    /// Model identifier
    pub model: String,
    /// Request timeout; none by default
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Remove a surrounding Markdown fence from the reply
    #[serde(default)]
    pub strip_code_fences: bool,
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: None,
            strip_code_fences: false,
        }
    }
}

impl AuraConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_endpoint.trim().is_empty() {
            return Err(TranslationError::ConfigError {
                message: "API endpoint is required".to_string(),
            });
        }

        if self.model.trim().is_empty() {
            return Err(TranslationError::ConfigError {
                message: "Model identifier is required".to_string(),
            });
        }

        if self.timeout_ms == Some(0) {
            return Err(TranslationError::ConfigError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Configured API key, if any non-blank one is present
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

/// Builds an [`AuraConfig`] from its layered sources.
///
/// Every call to [`ConfigLoader::load`] re-reads the file and environment,
/// so a changed key is picked up on the next invocation.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    api_key: Option<String>,
}

impl ConfigLoader {
    /// Create a loader reading `path` instead of the default `aura.*` file
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path, api_key: None }
    }

    /// Override the key regardless of file or environment
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Read all layers and return the merged configuration
    pub fn load(&self) -> Result<AuraConfig> {
        let mut builder = config::Config::builder()
            .set_default("api_endpoint", DEFAULT_API_ENDPOINT)?
            .set_default("model", DEFAULT_MODEL)?
            .set_default("strip_code_fences", false)?;

        builder = match &self.path {
            Some(path) => builder.add_source(config::File::from(path.as_path()).required(true)),
            None => builder.add_source(config::File::with_name("aura").required(false)),
        };

        builder = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("api_key", self.api_key.clone())?;

        let mut cfg: AuraConfig = builder.build()?.try_deserialize()?;

        if cfg.api_key().is_none() {
            if let Ok(key) = std::env::var(GEMINI_KEY_VAR) {
                debug!("Using API key from {}", GEMINI_KEY_VAR);
                cfg.api_key = key;
            }
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

impl SettingsSource for ConfigLoader {
    fn api_key(&self) -> Result<Option<String>> {
        let cfg = self.load()?;
        Ok(cfg.api_key().map(str::to_string))
    }
}
