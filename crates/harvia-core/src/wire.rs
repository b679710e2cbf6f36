//! JSON documents exchanged with the Harvia cloud.
//!
//! Field names follow the API's camelCase. Unknown fields are ignored so
//! that additions on the server side do not break the monitor.

use serde::{Deserialize, Serialize};

/// Response of the discovery URL.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryDocument {
    pub endpoints: DiscoveredEndpoints,
}

/// The `endpoints` object of the discovery document.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveredEndpoints {
    #[serde(rename = "RestApi", default)]
    pub rest_api: RestApiEndpoints,
}

/// REST services listed under `RestApi`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestApiEndpoints {
    pub generics: Option<ServiceEndpoint>,
    pub device: Option<ServiceEndpoint>,
    pub data: Option<ServiceEndpoint>,
}

/// One service entry; only the `https` base URL is used.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEndpoint {
    pub https: String,
}

/// Body of `POST /auth/token`.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/refresh`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
    pub email: &'a str,
}

/// Response of both token endpoints.
///
/// The refresh endpoint does not rotate the refresh token, so it may be
/// missing there.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub id_token: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Response of `GET /devices`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceList {
    #[serde(default)]
    pub devices: Vec<DeviceSummary>,
}

/// One device in a [`DeviceList`].
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSummary {
    pub name: String,
}

/// Response of `GET /data/latest-data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestData {
    #[serde(default)]
    pub data: Option<Telemetry>,
}

/// Telemetry snapshot; only the presence counter is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Telemetry {
    #[serde(default)]
    pub presence: Option<u32>,
}

impl LatestData {
    /// The presence value, if the snapshot carried one.
    pub fn presence(&self) -> Option<u32> {
        self.data.as_ref().and_then(|d| d.presence)
    }
}
