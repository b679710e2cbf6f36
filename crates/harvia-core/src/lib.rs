//! Core library for monitoring sauna presence through the Harvia cloud API.
//!
//! This crate talks to the Harvia REST services, turns the raw presence
//! telemetry of a sauna cabin into motion events and drives the polling
//! loop that ties the two together.
//!
//! # Features
//!
//! - **Endpoint discovery**: Resolve the per-service base URLs from the
//!   discovery document
//! - **Authentication**: Acquire a token session and renew it before expiry
//! - **Device resolution**: Pick the first device listed for the account
//! - **Telemetry polling**: Read the latest presence value of a cabin
//! - **Motion tracking**: Classify successive readings into motion events
//! - **Monitor loop**: Poll on a fixed interval until cancelled
//!
//! # Quick Start
//!
//! ```no_run
//! use harvia_core::{CloudPresenceSource, ConnectOptions, Monitor, presenter};
//! use harvia_types::Credentials;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new("user@example.com", "secret")?;
//!     let source = CloudPresenceSource::connect(credentials, &ConnectOptions::default()).await?;
//!
//!     let mut monitor = Monitor::new(source, harvia_core::DEFAULT_POLL_INTERVAL)?;
//!     monitor
//!         .run(CancellationToken::new(), |_, result| {
//!             if let Ok(events) = result {
//!                 for event in events {
//!                     println!("{}", presenter::describe(event));
//!                 }
//!             }
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod devices;
pub mod endpoints;
pub mod error;
pub mod mock;
pub mod monitor;
pub mod motion;
pub mod presenter;
pub mod source;
pub mod telemetry;
pub mod traits;
mod wire;

// Core exports
pub use auth::AuthSession;
pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use endpoints::DEFAULT_DISCOVERY_URL;
pub use error::{ApiError, Error, Result};
pub use mock::MockPresenceSource;
pub use monitor::{DEFAULT_POLL_INTERVAL, Flow, LoopState, Monitor, TickResult, policy};
pub use motion::{IDLE_REMINDER_INTERVAL, MOTION_GAP_THRESHOLD, MotionTracker};
pub use source::{CloudPresenceSource, ConnectOptions};
pub use telemetry::{DEFAULT_CABIN_ID, TelemetryPoller};
pub use traits::PresenceSource;

// Re-export from harvia-types
pub use harvia_types::{
    Credentials, DeviceRef, Endpoints, MotionEvent, MotionPhase, MotionState, RENEWAL_MARGIN,
    Reading, Session,
};
