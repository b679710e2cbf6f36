//! Configuration file management.
//!
//! Settings come from, highest precedence first: command-line flags (and
//! their environment variables), the TOML file, then built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use harvia_core::{ConnectOptions, DEFAULT_CABIN_ID, DEFAULT_DISCOVERY_URL};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Bounds for the poll interval, in seconds.
const POLL_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 1..=3600;

/// Bounds for the request timeout, in seconds.
const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=120;

/// Monitor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Polling settings.
    pub monitor: MonitorConfig,
    /// Cloud API settings.
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicitly given file must exist; a missing default file yields
    /// the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Overlay command-line settings on top of the file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(interval) = cli.interval {
            self.monitor.poll_interval = interval;
        }
        if let Some(cabin) = &cli.cabin {
            self.monitor.cabin_id = cabin.clone();
        }
        if let Some(device) = &cli.device {
            self.monitor.device = Some(device.clone());
        }
        if let Some(url) = &cli.discovery_url {
            self.api.discovery_url = url.clone();
        }
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Poll interval is between 1 second and 1 hour
    /// - Request timeout is between 1 and 120 seconds
    /// - Cabin id is not empty, and device id is not empty when given
    /// - Discovery URL is an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = self.monitor.validate();
        errors.extend(self.api.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.poll_interval)
    }

    /// Options for connecting the cloud presence source.
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions::default()
            .discovery_url(self.api.discovery_url.as_str())
            .cabin_id(self.monitor.cabin_id.as_str())
            .device(self.monitor.device.clone())
            .timeout(Duration::from_secs(self.api.timeout_secs))
    }
}

/// Polling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between polls.
    pub poll_interval: u64,
    /// Cabin to watch.
    pub cabin_id: String,
    /// Device to watch; the first listed device when unset.
    pub device: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: harvia_core::DEFAULT_POLL_INTERVAL.as_secs(),
            cabin_id: DEFAULT_CABIN_ID.to_string(),
            device: None,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !POLL_INTERVAL_RANGE.contains(&self.poll_interval) {
            errors.push(ValidationError {
                field: "monitor.poll_interval".to_string(),
                message: format!(
                    "must be between {} and {} seconds, got {}",
                    POLL_INTERVAL_RANGE.start(),
                    POLL_INTERVAL_RANGE.end(),
                    self.poll_interval
                ),
            });
        }

        if self.cabin_id.trim().is_empty() {
            errors.push(ValidationError {
                field: "monitor.cabin_id".to_string(),
                message: "cannot be empty".to_string(),
            });
        }

        if let Some(device) = &self.device
            && device.trim().is_empty()
        {
            errors.push(ValidationError {
                field: "monitor.device".to_string(),
                message: "cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Cloud API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint discovery document URL.
    pub discovery_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            timeout_secs: harvia_core::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let url = self.discovery_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            errors.push(ValidationError {
                field: "api.discovery_url".to_string(),
                message: format!("must be an http(s) URL, got '{}'", self.discovery_url),
            });
        }

        if !TIMEOUT_RANGE.contains(&self.timeout_secs) {
            errors.push(ValidationError {
                field: "api.timeout_secs".to_string(),
                message: format!(
                    "must be between {} and {} seconds, got {}",
                    TIMEOUT_RANGE.start(),
                    TIMEOUT_RANGE.end(),
                    self.timeout_secs
                ),
            });
        }

        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field path (e.g., `monitor.poll_interval`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("harvia")
        .join("monitor.toml")
}
