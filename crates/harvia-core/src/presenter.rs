//! Human-readable rendering of durations and motion events.
//!
//! Everything here is pure. Colour and timestamps are added by the CLI.

use harvia_types::MotionEvent;
use time::Duration;

/// Format a number of seconds as a coarse human-readable duration.
///
/// Below a minute the exact seconds are shown; below an hour whole minutes;
/// above that hours plus whole minutes, omitting a zero minutes segment.
///
/// ```
/// use harvia_core::presenter::format_duration;
///
/// assert_eq!(format_duration(59), "59 seconds");
/// assert_eq!(format_duration(90), "1 minute");
/// assert_eq!(format_duration(3661), "1 hour 1 minute");
/// ```
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{} seconds", seconds)
    } else if seconds < 3600 {
        plural(seconds / 60, "minute")
    } else {
        let hours = plural(seconds / 3600, "hour");
        match (seconds % 3600) / 60 {
            0 => hours,
            minutes => format!("{} {}", hours, plural(minutes, "minute")),
        }
    }
}

/// [`format_duration`] for a `time::Duration`, clamping negatives to zero.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    format_duration(elapsed.whole_seconds().max(0) as u64)
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// One-line description of an event, without timestamp or colour.
#[must_use]
pub fn describe(event: &MotionEvent) -> String {
    match event {
        MotionEvent::InitialIdle => "Initial state: No motion detected".to_string(),
        MotionEvent::InitialActive { value } => {
            format!("Initial state: Motion detected ({})", value)
        }
        MotionEvent::Started {
            value,
            since_last_motion: Some(gap),
        } => format!(
            "Motion detected ({}) - Last motion: {} ago",
            value,
            format_elapsed(*gap)
        ),
        MotionEvent::Started {
            value,
            since_last_motion: None,
        } => format!("Motion detected ({})", value),
        MotionEvent::Stopped => {
            "No motion detected - Person may still be present but sitting still".to_string()
        }
        MotionEvent::Intensified { from, to } => {
            format!("Movement increasing ({} → {})", from, to)
        }
        MotionEvent::Diminished { from, to } => {
            format!("Movement decreasing ({} → {})", from, to)
        }
        MotionEvent::IdleReminder { idle_for } => {
            format!("Last motion: {} ago", format_elapsed(*idle_for))
        }
    }
}
