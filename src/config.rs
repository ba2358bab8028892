//! Command line configuration
//!
//! Optional JSON file; every key has a default, so `{}` is a valid config.
//!
//! ```json
//! { "language": "pt", "log_level": "debug", "log_format": "json" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::cli::{CliError, CliResult};
use crate::messages::Language;

/// Log line format on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Built-in message language used when a request names none
    #[serde(default = "default_language")]
    pub language: String,

    /// Filter directive, e.g. `warn` or `formcheck=debug`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_language() -> String {
    "en".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        self.language().map_err(|_| {
            CliError::config_error(format!("Unsupported language: '{}'", self.language))
        })?;

        EnvFilter::try_new(&self.log_level).map_err(|e| {
            CliError::config_error(format!("Invalid log_level '{}': {}", self.log_level, e))
        })?;

        Ok(())
    }

    /// Configured language, parsed
    pub fn language(&self) -> CliResult<Language> {
        Ok(self.language.parse::<Language>()?)
    }
}
