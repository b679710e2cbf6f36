//! Scripted presence source for testing.
//!
//! [`MockPresenceSource`] plays back a queue of results, one per call, so
//! the monitor loop can be exercised without network access.
//!
//! # Features
//!
//! - **Scripted values**: queue presence values and absent readings
//! - **Failure injection**: queue errors for specific ticks
//! - **Call accounting**: count fetches and record the tick times seen

use std::collections::VecDeque;

use async_trait::async_trait;
use harvia_types::DeviceRef;
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::traits::PresenceSource;

/// A presence source that replays a script.
///
/// Once the script is exhausted every call returns `Ok(None)`.
///
/// # Example
///
/// ```
/// use harvia_core::{MockPresenceSource, PresenceSource};
/// use time::OffsetDateTime;
///
/// #[tokio::main]
/// async fn main() {
///     let mut source = MockPresenceSource::new("sauna-01")
///         .with_value(0)
///         .with_value(4);
///
///     let now = OffsetDateTime::now_utc();
///     assert_eq!(source.fetch_presence(now).await.unwrap(), Some(0));
///     assert_eq!(source.fetch_presence(now).await.unwrap(), Some(4));
///     assert_eq!(source.fetch_presence(now).await.unwrap(), None);
///     assert_eq!(source.calls(), 3);
/// }
/// ```
#[derive(Debug)]
pub struct MockPresenceSource {
    device: DeviceRef,
    script: VecDeque<Result<Option<u32>>>,
    seen: Vec<OffsetDateTime>,
}

impl MockPresenceSource {
    /// Create an empty mock for the given device id.
    ///
    /// The id is taken verbatim.
    pub fn new(device_id: &str) -> Self {
        Self {
            device: DeviceRef {
                device_id: device_id.to_string(),
            },
            script: VecDeque::new(),
            seen: Vec::new(),
        }
    }

    /// Queue a presence value.
    #[must_use]
    pub fn with_value(mut self, value: u32) -> Self {
        self.push(Ok(Some(value)));
        self
    }

    /// Queue a reading without a presence value.
    #[must_use]
    pub fn with_absent(mut self) -> Self {
        self.push(Ok(None));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn with_error(mut self, error: Error) -> Self {
        self.push(Err(error));
        self
    }

    /// Queue an arbitrary result.
    pub fn push(&mut self, result: Result<Option<u32>>) {
        self.script.push_back(result);
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> usize {
        self.seen.len()
    }

    /// Tick times passed to each fetch, in order.
    pub fn seen(&self) -> &[OffsetDateTime] {
        &self.seen
    }

    /// Entries left in the script.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

#[async_trait]
impl PresenceSource for MockPresenceSource {
    fn device(&self) -> &DeviceRef {
        &self.device
    }

    async fn fetch_presence(&mut self, now: OffsetDateTime) -> Result<Option<u32>> {
        self.seen.push(now);
        self.script.pop_front().unwrap_or(Ok(None))
    }
}
