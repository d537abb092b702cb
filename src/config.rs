//! Configuration management for StarCharge
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files. The vendor API request itself (url, method,
//! headers) is not part of this file's schema; it lives in a separate JSON blob
//! that goes through [`crate::setup::ConfigValidator`].

use crate::error::{Result, StarChargeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "STARCHARGE_CONFIG";

/// Default poll cadence in seconds
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 15;

/// Default bound on a single vendor request in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the JSON setup blob (`url`, `method`, `headers`)
    pub api_config_file: Option<String>,

    /// Inline JSON setup blob; takes precedence over `api_config_file`
    pub api_config_json: Option<String>,

    /// Poll interval in seconds
    pub scan_interval_secs: u64,

    /// Timeout for each vendor request in seconds
    pub request_timeout_secs: u64,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Web server binding configuration
    pub web: WebConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file (or directory)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Serve the sensor API at all
    pub enabled: bool,

    /// Bind address
    pub host: String,

    /// TCP port
    pub port: u16,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/starcharge.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8089,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_config_file: None,
            api_config_json: None,
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            logging: LoggingConfig::default(),
            web: WebConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first location that exists
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        let default_paths = [
            "starcharge.yaml",
            "/data/starcharge.yaml",
            "/etc/starcharge/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Raw setup blob, either inline or read from `api_config_file`
    pub fn read_api_config_text(&self) -> Result<String> {
        if let Some(inline) = self.api_config_json.as_ref() {
            return Ok(inline.clone());
        }
        match self.api_config_file.as_ref() {
            Some(path) => Ok(std::fs::read_to_string(path)?),
            None => Err(StarChargeError::config(
                "Neither api_config_json nor api_config_file is set",
            )),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let has_inline = self
            .api_config_json
            .as_ref()
            .is_some_and(|s| !s.trim().is_empty());
        let has_file = self
            .api_config_file
            .as_ref()
            .is_some_and(|s| !s.trim().is_empty());
        if !has_inline && !has_file {
            return Err(StarChargeError::validation(
                "api_config_file",
                "An API configuration source is required",
            ));
        }

        if self.scan_interval_secs == 0 {
            return Err(StarChargeError::validation(
                "scan_interval_secs",
                "Must be greater than 0",
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(StarChargeError::validation(
                "request_timeout_secs",
                "Must be greater than 0",
            ));
        }

        if self.web.enabled && self.web.port == 0 {
            return Err(StarChargeError::validation(
                "web.port",
                "Port must be greater than 0",
            ));
        }

        crate::logging::parse_log_level(&self.logging.level)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_inline() -> Config {
        Config {
            api_config_json: Some(r#"{"url":"http://x","method":"GET","headers":{}}"#.into()),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan_interval_secs, 15);
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.web.enabled);
        assert!(config.api_config_file.is_none());
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_err());

        let mut config = with_inline();
        assert!(config.validate().is_ok());

        config.scan_interval_secs = 0;
        assert!(config.validate().is_err());

        config = with_inline();
        config.logging.level = "LOUD".into();
        assert!(config.validate().is_err());

        config = with_inline();
        config.web.port = 0;
        assert!(config.validate().is_err());
        config.web.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("scan_interval_secs: 30\n").unwrap();
        assert_eq!(config.scan_interval_secs, 30);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.logging.level, "INFO");
    }

    #[test]
    fn test_inline_blob_wins_over_file() {
        let mut config = with_inline();
        config.api_config_file = Some("/nonexistent/api.json".into());
        let text = config.read_api_config_text().unwrap();
        assert!(text.contains("\"url\""));

        config.api_config_json = None;
        assert!(config.read_api_config_text().is_err());
    }
}
