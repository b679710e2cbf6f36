//! Latest-telemetry polling.

use harvia_types::{DeviceRef, Endpoints, Session};
use reqwest::Url;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::{ApiError, Error, Result};
use crate::wire::LatestData;

/// Cabin (sub-device) polled when none is configured.
pub const DEFAULT_CABIN_ID: &str = "C1";

/// Fetches the presence counter of one device cabin.
///
/// Each call issues exactly one request; retry policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct TelemetryPoller {
    client: ApiClient,
    data_url: String,
    cabin_id: String,
}

impl TelemetryPoller {
    /// Create a poller for the given cabin.
    pub fn new(client: ApiClient, endpoints: &Endpoints, cabin_id: impl Into<String>) -> Self {
        Self {
            client,
            data_url: endpoints.data.clone(),
            cabin_id: cabin_id.into(),
        }
    }

    /// The cabin this poller reads.
    pub fn cabin_id(&self) -> &str {
        &self.cabin_id
    }

    /// Fetch the latest presence value.
    ///
    /// Returns `Ok(None)` when the snapshot has no presence field; transport
    /// and HTTP failures are [`Error::Fetch`].
    pub async fn fetch_presence(
        &self,
        session: &Session,
        device: &DeviceRef,
    ) -> Result<Option<u32>> {
        let url = Url::parse_with_params(
            &format!("{}/data/latest-data", self.data_url),
            &[
                ("deviceId", device.device_id.as_str()),
                ("cabinId", self.cabin_id.as_str()),
            ],
        )
        .map_err(|e| Error::Fetch(ApiError::InvalidUrl(e.to_string())))?;

        let latest: LatestData = self
            .client
            .get_json_authorized(url.as_str(), &session.id_token)
            .await
            .map_err(Error::Fetch)?;

        let presence = latest.presence();
        debug!("Presence for {}: {:?}", device, presence);
        Ok(presence)
    }
}
