//! HTTP client shared by all Harvia cloud calls.
//!
//! [`ApiClient`] wraps a `reqwest::Client` with a request timeout and the
//! JSON request/response helpers used by the endpoint, auth, device and
//! telemetry modules. Higher-level modules map [`ApiError`] into the
//! matching [`crate::Error`] variant.
//!
//! # Example
//!
//! ```no_run
//! use harvia_core::client::ApiClient;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(Duration::from_secs(10))?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result type for HTTP operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// HTTP client for the Harvia REST services.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("harvia-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self { client })
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// `GET` a JSON document without authentication.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        self.send(url, self.client.get(url)).await
    }

    /// `GET` a JSON document with a bearer token.
    pub async fn get_json_authorized<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: &str,
    ) -> ApiResult<T> {
        self.send(url, self.client.get(url).bearer_auth(bearer)).await
    }

    /// `POST` a JSON body and decode a JSON response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.send(url, self.client.post(url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> ApiResult<T> {
        debug!("Request {}", url);
        let response = request.send().await.map_err(|e| ApiError::NotReachable {
            url: url.to_string(),
            source: e,
        })?;

        handle_response(response).await
    }
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        response.json().await.map_err(ApiError::Request)
    } else {
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| error_message(&v))
            .unwrap_or_else(|| status.to_string());

        debug!("Request failed with {}: {}", status, message);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &serde_json::Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()).map(String::from))
}
