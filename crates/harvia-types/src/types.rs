//! Core types for the Harvia cloud API and presence readings.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::error::{ParseError, ParseResult};

/// Seconds before token expiry at which a session is considered stale.
///
/// Renewal happens on the first tick at or after `expires_at - RENEWAL_MARGIN`.
pub const RENEWAL_MARGIN: Duration = Duration::seconds(300);

/// Base URLs of the Harvia cloud services, as published by the discovery
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Endpoints {
    /// Generic REST service (authentication).
    pub generics: String,
    /// Device REST service (device listing).
    pub device: String,
    /// Data REST service (telemetry).
    pub data: String,
}

impl Endpoints {
    /// Build an endpoint set, trimming trailing slashes and rejecting
    /// non-http(s) URLs.
    pub fn new(
        generics: impl Into<String>,
        device: impl Into<String>,
        data: impl Into<String>,
    ) -> ParseResult<Self> {
        Ok(Self {
            generics: normalize_base_url("generics", generics.into())?,
            device: normalize_base_url("device", device.into())?,
            data: normalize_base_url("data", data.into())?,
        })
    }
}

fn normalize_base_url(service: &'static str, url: String) -> ParseResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(ParseError::InvalidUrl { service, url });
    }
    Ok(trimmed.to_string())
}

/// Account credentials used for primary authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account username (also sent as `email` on refresh).
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Create credentials, rejecting empty values.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> ParseResult<Self> {
        let username = username.into();
        let password = password.into();
        if username.trim().is_empty() {
            return Err(ParseError::Empty("username"));
        }
        if password.is_empty() {
            return Err(ParseError::Empty("password"));
        }
        Ok(Self { username, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated session with the Harvia cloud.
///
/// `expires_at` is the instant after which `id_token` is expected to be
/// rejected by the API. The refresh token is captured at acquisition time
/// and kept across refreshes.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token for REST calls.
    pub id_token: String,
    /// Access token (unused by REST calls, kept for completeness).
    pub access_token: String,
    /// Token used to obtain a fresh `id_token`.
    pub refresh_token: String,
    /// Instant after which `id_token` is no longer accepted.
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Whether the session should be renewed at `now`.
    ///
    /// A session is stale from `expires_at - RENEWAL_MARGIN` onwards.
    #[must_use]
    pub fn is_stale(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at - RENEWAL_MARGIN
    }

    /// Whether the token has already expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }

    /// Time remaining until expiry (negative once expired).
    #[must_use]
    pub fn remaining(&self, now: OffsetDateTime) -> Duration {
        self.expires_at - now
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id_token", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The device being monitored. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceRef {
    /// Device identifier as used by the data service (`deviceId`).
    pub device_id: String,
}

impl DeviceRef {
    /// Create a device reference, rejecting blank identifiers.
    pub fn new(device_id: impl Into<String>) -> ParseResult<Self> {
        let device_id = device_id.into();
        let trimmed = device_id.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty("device id"));
        }
        Ok(Self {
            device_id: trimmed.to_string(),
        })
    }
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.device_id)
    }
}

/// A single presence poll result.
///
/// `value` is `None` when the API returned no presence field. That is a
/// distinct "no data" condition and is never treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Motion intensity reported by the PIR sensor.
    pub value: Option<u32>,
    /// When the reading was taken.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub observed_at: OffsetDateTime,
}

impl Reading {
    /// Create a reading.
    pub fn new(value: Option<u32>, observed_at: OffsetDateTime) -> Self {
        Self { value, observed_at }
    }

    /// A reading with no presence value.
    pub fn absent(observed_at: OffsetDateTime) -> Self {
        Self {
            value: None,
            observed_at,
        }
    }
}
