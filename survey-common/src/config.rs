//! Configuration loading for the survey sink
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`SURVEY_SINK_CONFIG`)
//! 3. Default config file for the platform
//! 4. Compiled defaults (fallback)
//!
//! A missing config file is not fatal: a warning is logged and compiled
//! defaults are used. A config file that exists but cannot be parsed is an
//! error.

use crate::schema::ColumnSchema;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the sink config file
pub const CONFIG_ENV_VAR: &str = "SURVEY_SINK_CONFIG";

/// Default HTTP port of the sink
pub const DEFAULT_PORT: u16 = 5780;

/// Sink configuration loaded from TOML
///
/// ```toml
/// bind_address = "0.0.0.0"
/// port = 5780
/// database_path = "/var/lib/survey/responses.db"
///
/// [schema]
/// headers = ["Timestamp", "Usage Level", "Department"]
///
/// [summary]
/// columns = ["Usage Level", "Department"]
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite file holding the response table
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default)]
    pub schema: SchemaConfig,

    #[serde(default)]
    pub summary: SummaryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Column schema written to an empty store
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SchemaConfig {
    /// Display headers in column order; standard headers when absent
    #[serde(default)]
    pub headers: Option<Vec<String>>,
}

impl SchemaConfig {
    pub fn column_schema(&self) -> ColumnSchema {
        match &self.headers {
            Some(headers) => ColumnSchema::from_headers(headers.iter().cloned()),
            None => ColumnSchema::standard(),
        }
    }
}

/// Columns counted by the summary endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_summary_columns")]
    pub columns: Vec<String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            columns: default_summary_columns(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            database_path: default_database_path(),
            schema: SchemaConfig::default(),
            summary: SummaryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_summary_columns() -> Vec<String> {
    vec!["Usage Level".to_string(), "Department".to_string()]
}

/// Get OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("survey"))
        .unwrap_or_else(|| PathBuf::from("./survey_data"))
}

fn default_database_path() -> PathBuf {
    default_data_folder().join("responses.db")
}

/// Get default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("survey").join("sink.toml"))
}

/// Resolve which config file to read, if any
///
/// Returns `None` when neither the CLI nor the environment names a file and
/// the platform has no config directory.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config file
    default_config_path()
}

impl SinkConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SinkConfig = toml::from_str(text)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults when missing
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            warn!("No config file location available, using compiled defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            warn!(
                "Config file not found at {}, using compiled defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(headers) = &self.schema.headers {
            if headers.iter().any(|h| h.trim().is_empty()) {
                return Err(Error::Config("Schema headers must not be blank".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        assert_eq!(default_port(), 5780);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = SinkConfig::from_toml_str("").unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.summary.columns, vec!["Usage Level", "Department"]);
        assert_eq!(config.schema.column_schema(), ColumnSchema::standard());
    }

    #[test]
    fn test_custom_headers() {
        let config = SinkConfig::from_toml_str(
            r#"
            port = 6000
            [schema]
            headers = ["Usage Level", "New Field"]
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 6000);
        assert_eq!(
            config.schema.column_schema().headers(),
            vec!["Timestamp", "Usage Level", "New Field"]
        );
    }

    #[test]
    fn test_blank_header_rejected() {
        let result = SinkConfig::from_toml_str(
            r#"
            [schema]
            headers = ["Usage Level", "  "]
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = SinkConfig::from_toml_str("port = \"not a number\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
