//! Presence source backed by the Harvia cloud.
//!
//! [`CloudPresenceSource::connect`] performs the whole startup sequence:
//! endpoint discovery, authentication and device resolution. Any failure
//! there is fatal. Afterwards each [`PresenceSource::fetch_presence`] call
//! renews the session if needed and issues one telemetry request.

use std::time::Duration;

use async_trait::async_trait;
use harvia_types::{Credentials, DeviceRef};
use time::OffsetDateTime;
use tracing::info;

use crate::auth::AuthSession;
use crate::client::{ApiClient, DEFAULT_TIMEOUT};
use crate::devices::{self, DEFAULT_MAX_RESULTS};
use crate::endpoints::{self, DEFAULT_DISCOVERY_URL};
use crate::error::{Error, Result};
use crate::telemetry::{DEFAULT_CABIN_ID, TelemetryPoller};
use crate::traits::PresenceSource;

/// Options for [`CloudPresenceSource::connect`].
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Discovery document URL.
    pub discovery_url: String,
    /// Cabin (sub-device) to poll.
    pub cabin_id: String,
    /// Device to monitor; the first listed device when `None`.
    pub device: Option<String>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            cabin_id: DEFAULT_CABIN_ID.to_string(),
            device: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ConnectOptions {
    /// Set the discovery URL.
    #[must_use]
    pub fn discovery_url(mut self, url: impl Into<String>) -> Self {
        self.discovery_url = url.into();
        self
    }

    /// Set the cabin id.
    #[must_use]
    pub fn cabin_id(mut self, cabin_id: impl Into<String>) -> Self {
        self.cabin_id = cabin_id.into();
        self
    }

    /// Monitor a specific device instead of the first listed one.
    #[must_use]
    pub fn device(mut self, device: Option<String>) -> Self {
        self.device = device;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Presence source reading the latest telemetry from the Harvia cloud.
#[derive(Debug)]
pub struct CloudPresenceSource {
    auth: AuthSession,
    poller: TelemetryPoller,
    device: DeviceRef,
}

impl CloudPresenceSource {
    /// Assemble a source from already-initialised parts.
    pub fn new(auth: AuthSession, poller: TelemetryPoller, device: DeviceRef) -> Self {
        Self {
            auth,
            poller,
            device,
        }
    }

    /// Discover endpoints, authenticate and resolve the device.
    pub async fn connect(credentials: Credentials, options: &ConnectOptions) -> Result<Self> {
        let client = ApiClient::new(options.timeout).map_err(Error::Discovery)?;
        let endpoints = endpoints::resolve(&client, &options.discovery_url).await?;
        let auth = AuthSession::acquire(client.clone(), &endpoints, credentials).await?;

        let device = match &options.device {
            Some(id) => {
                let device = DeviceRef::new(id.as_str())?;
                info!("Monitoring configured device {}", device);
                device
            }
            None => {
                devices::resolve_first(&client, &endpoints, auth.session(), DEFAULT_MAX_RESULTS)
                    .await?
            }
        };

        let poller = TelemetryPoller::new(client, &endpoints, options.cabin_id.as_str());
        Ok(Self::new(auth, poller, device))
    }

    /// The authentication session.
    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }
}

#[async_trait]
impl PresenceSource for CloudPresenceSource {
    fn device(&self) -> &DeviceRef {
        &self.device
    }

    async fn fetch_presence(&mut self, now: OffsetDateTime) -> Result<Option<u32>> {
        let session = self.auth.refresh_if_needed(now).await?;
        self.poller.fetch_presence(session, &self.device).await
    }
}
