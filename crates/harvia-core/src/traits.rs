//! Trait abstractions for presence sources.
//!
//! This module provides the [`PresenceSource`] trait that abstracts over
//! the Harvia cloud and scripted sources for testing.

use async_trait::async_trait;
use harvia_types::DeviceRef;
use time::OffsetDateTime;

use crate::error::Result;

/// Something that can report the current presence value of one device.
///
/// The monitor loop is written against this trait, so it works the same
/// with [`crate::CloudPresenceSource`] and [`crate::MockPresenceSource`].
///
/// # Example
///
/// ```no_run
/// use harvia_core::{PresenceSource, Result};
/// use time::OffsetDateTime;
///
/// async fn print_presence<S: PresenceSource>(source: &mut S) -> Result<()> {
///     let value = source.fetch_presence(OffsetDateTime::now_utc()).await?;
///     println!("{}: {:?}", source.device(), value);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait PresenceSource: Send {
    /// The device this source reads.
    fn device(&self) -> &DeviceRef;

    /// Fetch the current presence value.
    ///
    /// `now` is the tick time; sources that hold credentials use it to
    /// decide whether to renew them first. `Ok(None)` means the device
    /// reported no presence value.
    async fn fetch_presence(&mut self, now: OffsetDateTime) -> Result<Option<u32>>;
}
