//! Device resolution.
//!
//! The monitor watches exactly one device. Unless the operator names one,
//! the first device returned by the device service is used.

use harvia_types::{DeviceRef, Endpoints, Session};
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::wire::DeviceList;

/// Number of devices requested when picking the first one.
pub const DEFAULT_MAX_RESULTS: u32 = 1;

/// List the account's devices and return the first one's name.
///
/// Fails with [`Error::NoDevice`] when the list is empty.
pub async fn resolve_first(
    client: &ApiClient,
    endpoints: &Endpoints,
    session: &Session,
    max_results: u32,
) -> Result<DeviceRef> {
    let url = format!("{}/devices?maxResults={}", endpoints.device, max_results);
    debug!("Listing devices (maxResults={})", max_results);

    let list: DeviceList = client
        .get_json_authorized(&url, &session.id_token)
        .await
        .map_err(Error::DeviceList)?;

    let device = first_device(list)?;
    info!("Monitoring device {}", device);
    Ok(device)
}

fn first_device(list: DeviceList) -> Result<DeviceRef> {
    let first = list.devices.into_iter().next().ok_or(Error::NoDevice)?;
    Ok(DeviceRef::new(first.name)?)
}
