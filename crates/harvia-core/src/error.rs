//! Error types for harvia-core.
//!
//! This module defines all error types that can occur while talking to the
//! Harvia cloud and running the monitor loop.
//!
//! # Error Recovery Strategies
//!
//! Errors fall into two groups. Startup errors make monitoring impossible
//! and end the process; iteration errors only affect the current poll.
//!
//! | Error Type | Phase | Strategy |
//! |------------|-------|----------|
//! | [`Error::Discovery`] | Startup | Fatal, check network or discovery URL |
//! | [`Error::Auth`] | Startup | Fatal, check credentials |
//! | [`Error::DeviceList`] | Startup | Fatal |
//! | [`Error::NoDevice`] | Startup | Fatal, nothing to watch |
//! | [`Error::InvalidConfig`] | Startup | Fatal, fix configuration |
//! | [`Error::Refresh`] | Loop | Skip tick, retry on next interval |
//! | [`Error::Fetch`] | Loop | Skip tick, retry on next interval |
//!
//! [`Error::is_recoverable`] encodes this table and is what the monitor
//! loop consults to decide whether to keep running.

use thiserror::Error;

/// Errors produced by the HTTP layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The service could not be reached.
    #[error("Service not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request or response body handling failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// A URL was malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The discovery document did not list a required service.
    #[error("Discovery document has no entry for service '{0}'")]
    MissingService(&'static str),

    /// A response was missing a field the monitor depends on.
    #[error("Response is missing required field '{0}'")]
    MissingField(&'static str),

    /// A response field held a value the monitor cannot use.
    #[error("Response field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ApiError {
    /// HTTP status code, if the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Errors that can occur while monitoring a Harvia device.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The endpoint discovery document could not be fetched or parsed.
    #[error("Endpoint discovery failed: {0}")]
    Discovery(#[source] ApiError),

    /// Primary authentication was rejected or could not be performed.
    #[error("Authentication failed: {0}")]
    Auth(#[source] ApiError),

    /// Token refresh failed.
    #[error("Token refresh failed: {0}")]
    Refresh(#[source] ApiError),

    /// The device list could not be fetched.
    #[error("Failed to list devices: {0}")]
    DeviceList(#[source] ApiError),

    /// The account has no devices.
    #[error("No devices found for this account")]
    NoDevice,

    /// The latest telemetry could not be fetched.
    #[error("Failed to fetch telemetry: {0}")]
    Fetch(#[source] ApiError),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Whether the monitor loop may continue after this error.
    ///
    /// Only per-poll failures are recoverable; everything else means the
    /// monitor has nothing to work with.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Fetch(_) | Error::Refresh(_))
    }
}

impl From<harvia_types::ParseError> for Error {
    fn from(err: harvia_types::ParseError) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

/// Result type alias using harvia-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
