//! Command-line sauna presence monitor for the Harvia cloud.
//!
//! The `harvia-monitor` binary logs in to the Harvia cloud, picks a sauna
//! device and polls the presence sensor of one cabin, printing a
//! timestamped line whenever motion starts, stops or changes intensity.
//!
//! # Configuration
//!
//! Settings are read from `~/.config/harvia/monitor.toml` (or platform
//! equivalent, or `--config`), then overridden by flags and environment:
//!
//! ```toml
//! [monitor]
//! poll_interval = 5
//! cabin_id = "C1"
//! # device = "my-sauna"
//!
//! [api]
//! discovery_url = "https://prod.api.harvia.io/endpoints"
//! timeout_secs = 10
//! ```
//!
//! # Environment Variables
//!
//! - `HARVIA_USERNAME` / `HARVIA_PASSWORD`: account credentials (required)
//! - `POLL_INTERVAL`: seconds between polls
//! - `HARVIA_DEVICE`: device to monitor
//! - `NO_COLOR`: disable colored output when set
//! - `RUST_LOG`: log filter for diagnostics on stderr
//!
//! # Examples
//!
//! ```bash
//! HARVIA_USERNAME=me@example.com HARVIA_PASSWORD=secret harvia-monitor --interval 10
//! ```

pub mod cli;
pub mod config;
pub mod style;

pub use harvia_core;
pub use harvia_types;
