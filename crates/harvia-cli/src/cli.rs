//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "harvia-monitor")]
#[command(
    author,
    version,
    about = "Watch sauna presence through the Harvia cloud API",
    long_about = "Polls the presence sensor of a Harvia sauna cabin and prints a line \
                  whenever motion starts, stops or changes intensity, plus periodic \
                  reminders while the cabin stays still. Stop with Ctrl+C."
)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output (also honours NO_COLOR)
    #[arg(long)]
    pub no_color: bool,

    /// Harvia account username (email)
    #[arg(short, long, env = "HARVIA_USERNAME")]
    pub username: Option<String>,

    /// Harvia account password
    #[arg(short, long, env = "HARVIA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Seconds between polls
    #[arg(short, long, env = "POLL_INTERVAL")]
    pub interval: Option<u64>,

    /// Cabin to watch
    #[arg(short, long)]
    pub cabin: Option<String>,

    /// Device id to watch instead of the first device on the account
    #[arg(short, long, env = "HARVIA_DEVICE")]
    pub device: Option<String>,

    /// Endpoint discovery document URL
    #[arg(long)]
    pub discovery_url: Option<String>,

    /// Path to the configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
