//! Service endpoint discovery.
//!
//! The Harvia cloud publishes the base URLs of its services in a discovery
//! document. It is fetched once at startup; a failure here is fatal.

use harvia_types::Endpoints;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::{ApiError, Error, Result};
use crate::wire::{DiscoveryDocument, ServiceEndpoint};

/// Well-known discovery URL of the production cloud.
pub const DEFAULT_DISCOVERY_URL: &str = "https://prod.api.harvia.io/endpoints";

/// Fetch the discovery document and resolve the REST service base URLs.
pub async fn resolve(client: &ApiClient, discovery_url: &str) -> Result<Endpoints> {
    debug!("Fetching endpoint discovery document from {}", discovery_url);
    let document: DiscoveryDocument = client
        .get_json(discovery_url)
        .await
        .map_err(Error::Discovery)?;

    let endpoints = endpoints_from_document(document)?;
    info!(
        "Resolved endpoints (generics: {}, device: {}, data: {})",
        endpoints.generics, endpoints.device, endpoints.data
    );
    Ok(endpoints)
}

fn endpoints_from_document(document: DiscoveryDocument) -> Result<Endpoints> {
    let rest = document.endpoints.rest_api;
    let generics = require("generics", rest.generics)?;
    let device = require("device", rest.device)?;
    let data = require("data", rest.data)?;

    Endpoints::new(generics, device, data)
        .map_err(|e| Error::Discovery(ApiError::InvalidUrl(e.to_string())))
}

fn require(service: &'static str, entry: Option<ServiceEndpoint>) -> Result<String> {
    entry
        .map(|e| e.https)
        .ok_or(Error::Discovery(ApiError::MissingService(service)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> DiscoveryDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_endpoints_from_complete_document() {
        let doc = document(
            r#"{"endpoints": {"RestApi": {
                "generics": {"https": "https://g.example/"},
                "device": {"https": "https://d.example"},
                "data": {"https": "https://t.example"}
            }}}"#,
        );
        let endpoints = endpoints_from_document(doc).unwrap();
        assert_eq!(endpoints.generics, "https://g.example");
        assert_eq!(endpoints.device, "https://d.example");
        assert_eq!(endpoints.data, "https://t.example");
    }

    #[test]
    fn test_missing_service_is_discovery_error() {
        let doc = document(
            r#"{"endpoints": {"RestApi": {
                "generics": {"https": "https://g.example"},
                "device": {"https": "https://d.example"}
            }}}"#,
        );
        let err = endpoints_from_document(doc).unwrap_err();
        assert!(matches!(
            err,
            Error::Discovery(ApiError::MissingService("data"))
        ));
    }

    #[test]
    fn test_missing_rest_api_section() {
        let doc = document(r#"{"endpoints": {}}"#);
        let err = endpoints_from_document(doc).unwrap_err();
        assert!(matches!(
            err,
            Error::Discovery(ApiError::MissingService("generics"))
        ));
    }

    #[test]
    fn test_invalid_url_is_discovery_error() {
        let doc = document(
            r#"{"endpoints": {"RestApi": {
                "generics": {"https": "g.example"},
                "device": {"https": "https://d.example"},
                "data": {"https": "https://t.example"}
            }}}"#,
        );
        let err = endpoints_from_document(doc).unwrap_err();
        assert!(matches!(err, Error::Discovery(ApiError::InvalidUrl(_))));
    }
}
