//! Visual styling for the event log.
//!
//! Every event line is prefixed with a local `[YYYY-MM-DD HH:MM:SS]`
//! timestamp. Colored output adds a marker to motion starts and stops;
//! plain output carries no decorations.

use chrono::{DateTime, Local, TimeZone};
use harvia_core::{DeviceRef, MotionEvent, presenter};
use owo_colors::OwoColorize;
use time::OffsetDateTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether colors are disabled by flag or by a non-empty `NO_COLOR`.
pub fn no_color_requested(flag: bool) -> bool {
    flag || std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

/// Convert a tick time to the local wall clock.
pub fn local_time(at: OffsetDateTime) -> DateTime<Local> {
    DateTime::from_timestamp(at.unix_timestamp(), at.nanosecond())
        .map(|utc| utc.with_timezone(&Local))
        .unwrap_or_else(Local::now)
}

pub fn timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Format an event description with its color.
pub fn format_event(event: &MotionEvent, no_color: bool) -> String {
    let text = presenter::describe(event);
    if no_color {
        return text;
    }

    match event {
        MotionEvent::InitialIdle | MotionEvent::InitialActive { .. } => {
            format!("{}", text.yellow())
        }
        MotionEvent::Started { .. } => format!("🚶 {}", text.bold().green()),
        MotionEvent::Stopped => format!("⚠️  {}", text.yellow()),
        MotionEvent::Intensified { .. } => format!("{}", text.green()),
        MotionEvent::Diminished { .. } => format!("{}", text.cyan()),
        MotionEvent::IdleReminder { .. } => format!("{}", text.dimmed()),
    }
}

/// A timestamped event line.
pub fn event_line<Tz: TimeZone>(at: &DateTime<Tz>, event: &MotionEvent, no_color: bool) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("[{}] {}", timestamp(at), format_event(event, no_color))
}

/// A timestamped diagnostic for a failed poll.
pub fn error_line<Tz: TimeZone>(at: &DateTime<Tz>, message: &str, no_color: bool) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let text = format!("Error: {}", message);
    if no_color {
        format!("[{}] {}", timestamp(at), text)
    } else {
        format!("[{}] {}", timestamp(at), text.red())
    }
}

/// Startup banner.
pub fn banner(poll_interval_secs: u64, no_color: bool) -> String {
    let title = "Harvia Sauna Motion Monitor";
    let title = if no_color {
        title.to_string()
    } else {
        format!("{}", title.bold().blue())
    };
    format!(
        "{}\nPIR sensor - detects movement, not static presence\nPolling every {} seconds",
        title, poll_interval_secs
    )
}

pub fn device_line(device: &DeviceRef, no_color: bool) -> String {
    let text = format!("Monitoring device: {}", device);
    if no_color {
        text
    } else {
        format!("{}", text.cyan())
    }
}

pub fn stopped_line(no_color: bool) -> String {
    let text = "Monitoring stopped by user";
    if no_color {
        text.to_string()
    } else {
        format!("{}", text.yellow())
    }
}

/// Message for an error that ends the program.
pub fn fatal_line(message: &str, no_color: bool) -> String {
    let text = format!("Fatal error: {}", message);
    if no_color {
        text
    } else {
        format!("{}", text.red())
    }
}
