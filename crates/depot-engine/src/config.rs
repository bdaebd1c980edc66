//! Configuration for the depot client.
//!
//! Stored as JSON. Every field has a default, so a missing or partial file
//! is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the answer service.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Upper bound for a single request, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Suggested prompts shown under the input.
    #[serde(default = "default_suggestions")]
    pub suggestions: Vec<String>,

    /// UI tick interval in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_suggestions() -> Vec<String> {
    vec![
        "Show me project updates".into(),
        "Who\u{2019}s working on X?".into(),
        "Server details".into(),
    ]
}

fn default_tick_rate_ms() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_seconds: default_timeout_seconds(),
            suggestions: default_suggestions(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults if the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default location: `<config dir>/depot/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("depot").join("config.json"))
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, server_url: Option<String>, timeout_seconds: Option<u64>) -> Self {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if let Some(secs) = timeout_seconds {
            self.timeout_seconds = secs;
        }
        self
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.server_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {e}", self.server_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                self.server_url
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidTickRate);
        }
        Ok(())
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Server URL is not an absolute http(s) URL.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Timeout of zero seconds.
    #[error("Timeout must be at least one second")]
    InvalidTimeout,

    /// Tick interval of zero, which would spin the event thread.
    #[error("Tick rate must be at least one millisecond")]
    InvalidTickRate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://127.0.0.1:5000");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.suggestions.len(), 3);
        assert_eq!(config.suggestions[0], "Show me project updates");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"server_url": "https://depot.example"}"#).unwrap();
        assert_eq!(config.server_url, "https://depot.example");
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.tick_rate_ms, 250);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            timeout_seconds: 5,
            suggestions: vec!["Ping".into()],
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some("http://10.0.0.2:5000".into()), Some(3));
        assert_eq!(config.server_url, "http://10.0.0.2:5000");
        assert_eq!(config.timeout_seconds, 3);

        let untouched = Config::default().with_overrides(None, None);
        assert_eq!(untouched, Config::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_scheme = Config {
            server_url: "ftp://files.example".into(),
            ..Config::default()
        };
        assert!(matches!(bad_scheme.validate(), Err(ConfigError::InvalidUrl(_))));

        let relative = Config {
            server_url: "/chat".into(),
            ..Config::default()
        };
        assert!(matches!(relative.validate(), Err(ConfigError::InvalidUrl(_))));

        let zero = Config {
            timeout_seconds: 0,
            ..Config::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::InvalidTimeout)));

        let no_tick = Config {
            tick_rate_ms: 0,
            ..Config::default()
        };
        assert!(matches!(no_tick.validate(), Err(ConfigError::InvalidTickRate)));
    }

    #[test]
    fn test_load_accepts_zero_tick_rate_but_validate_rejects_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"tick_rate_ms": 0}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTickRate)));
    }
}
