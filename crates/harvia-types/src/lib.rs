//! Platform-agnostic types for the Harvia sauna motion monitor.
//!
//! This crate provides the data model shared by the cloud client
//! (harvia-core) and the command-line monitor (harvia-cli).
//!
//! # Features
//!
//! - Session and credential types with redacted `Debug` output
//! - Device references and presence readings
//! - Motion state and classified motion events
//! - Error types for value construction
//!
//! # Example
//!
//! ```
//! use harvia_types::{DeviceRef, MotionPhase, MotionState};
//!
//! let device = DeviceRef::new("sauna-01").unwrap();
//! assert_eq!(device.to_string(), "sauna-01");
//! assert_eq!(MotionState::default().phase(), MotionPhase::Unknown);
//! ```

pub mod error;
pub mod motion;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use motion::{MotionEvent, MotionPhase, MotionState};
pub use types::{Credentials, DeviceRef, Endpoints, RENEWAL_MARGIN, Reading, Session};
