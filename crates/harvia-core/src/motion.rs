//! Motion classification.
//!
//! [`observe`] is the pure transition function: it takes the previous
//! [`MotionState`] and one [`Reading`] and returns the next state together
//! with the events the reading produced. [`MotionTracker`] threads the state
//! through successive calls for the monitor loop.
//!
//! # Rules
//!
//! | Previous | Reading | Event |
//! |----------|---------|-------|
//! | any | absent | none, state unchanged |
//! | unknown | `0` | [`MotionEvent::InitialIdle`] |
//! | unknown | `> 0` | [`MotionEvent::InitialActive`] |
//! | `0` | `> 0` | [`MotionEvent::Started`] |
//! | `> 0` | `0` | [`MotionEvent::Stopped`] |
//! | `a > 0` | `b > 0`, `b != a` | [`MotionEvent::Intensified`] / [`MotionEvent::Diminished`] |
//! | `0` | `0` | [`MotionEvent::IdleReminder`], at most once per [`IDLE_REMINDER_INTERVAL`] |
//!
//! # Example
//!
//! ```
//! use harvia_core::motion::MotionTracker;
//! use harvia_types::{MotionEvent, Reading};
//! use time::OffsetDateTime;
//!
//! let mut tracker = MotionTracker::new();
//! let now = OffsetDateTime::now_utc();
//!
//! assert_eq!(tracker.observe(Reading::new(Some(0), now)), vec![MotionEvent::InitialIdle]);
//! assert!(tracker.observe(Reading::absent(now)).is_empty());
//! ```

use harvia_types::{MotionEvent, MotionState, Reading};
use time::Duration;

/// Gap since the previous motion above which a restart reports how long
/// the room was still.
pub const MOTION_GAP_THRESHOLD: Duration = Duration::seconds(30);

/// Minimum idle time before the first reminder, and minimum spacing
/// between reminders.
pub const IDLE_REMINDER_INTERVAL: Duration = Duration::seconds(30);

/// Apply one reading to `state`.
///
/// Absent readings return `state` unchanged with no events.
#[must_use]
pub fn observe(state: MotionState, reading: Reading) -> (MotionState, Vec<MotionEvent>) {
    let Some(value) = reading.value else {
        return (state, Vec::new());
    };
    let now = reading.observed_at;

    let mut next = state;
    let mut events = Vec::with_capacity(1);

    match state.last_value {
        None if value == 0 => events.push(MotionEvent::InitialIdle),
        None => events.push(MotionEvent::InitialActive { value }),
        Some(0) if value > 0 => {
            let since_last_motion = state
                .last_nonzero_at
                .map(|at| now - at)
                .filter(|gap| *gap > MOTION_GAP_THRESHOLD);
            events.push(MotionEvent::Started {
                value,
                since_last_motion,
            });
        }
        Some(last) if value == 0 && last > 0 => events.push(MotionEvent::Stopped),
        Some(last) if value > last => events.push(MotionEvent::Intensified {
            from: last,
            to: value,
        }),
        Some(last) if value < last => events.push(MotionEvent::Diminished {
            from: last,
            to: value,
        }),
        Some(_) => {
            if let Some(reminder) = idle_reminder(&state, value, reading) {
                events.push(reminder);
                next.last_idle_notice_at = Some(now);
            }
        }
    }

    if value > 0 {
        next.last_nonzero_at = Some(now);
    }

    if state.last_value != Some(value) {
        next.last_value = Some(value);
        next.last_change_at = Some(now);
        next.last_idle_notice_at = None;
    }

    (next, events)
}

/// Reminder for an unchanged zero reading, if one is due.
fn idle_reminder(state: &MotionState, value: u32, reading: Reading) -> Option<MotionEvent> {
    if value != 0 {
        return None;
    }
    let now = reading.observed_at;
    let idle_for = now - state.last_nonzero_at?;
    if idle_for < IDLE_REMINDER_INTERVAL {
        return None;
    }
    let due = state
        .last_idle_notice_at
        .is_none_or(|last| now - last >= IDLE_REMINDER_INTERVAL);

    due.then_some(MotionEvent::IdleReminder { idle_for })
}

/// Stateful wrapper around [`observe`].
#[derive(Debug, Clone, Default)]
pub struct MotionTracker {
    state: MotionState,
}

impl MotionTracker {
    /// Create a tracker with no observations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a known state.
    pub fn with_state(state: MotionState) -> Self {
        Self { state }
    }

    /// The current state.
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Feed one reading and return the events it produced.
    pub fn observe(&mut self, reading: Reading) -> Vec<MotionEvent> {
        let (next, events) = observe(self.state, reading);
        self.state = next;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvia_types::MotionPhase;
    use time::OffsetDateTime;
    use time::macros::datetime;

    const T0: OffsetDateTime = datetime!(2025-03-01 18:00 UTC);

    fn at(secs: i64) -> OffsetDateTime {
        T0 + Duration::seconds(secs)
    }

    fn reading(value: Option<u32>, secs: i64) -> Reading {
        Reading::new(value, at(secs))
    }

    fn feed(tracker: &mut MotionTracker, value: Option<u32>, secs: i64) -> Vec<MotionEvent> {
        tracker.observe(reading(value, secs))
    }

    #[test]
    fn test_absent_reading_is_noop() {
        let state = MotionState {
            last_value: Some(3),
            last_change_at: Some(at(0)),
            last_nonzero_at: Some(at(0)),
            last_idle_notice_at: None,
        };
        let (next, events) = observe(state, reading(None, 100));
        assert_eq!(next, state);
        assert!(events.is_empty());
    }

    #[test]
    fn test_initial_idle() {
        let (state, events) = observe(MotionState::default(), reading(Some(0), 0));
        assert_eq!(events, vec![MotionEvent::InitialIdle]);
        assert_eq!(state.phase(), MotionPhase::Idle);
        assert_eq!(state.last_change_at, Some(at(0)));
        assert_eq!(state.last_nonzero_at, None);
    }

    #[test]
    fn test_initial_active_sets_last_nonzero() {
        let (state, events) = observe(MotionState::default(), reading(Some(4), 0));
        assert_eq!(events, vec![MotionEvent::InitialActive { value: 4 }]);
        assert_eq!(state.last_nonzero_at, Some(at(0)));
        assert_eq!(state.phase(), MotionPhase::Active);
    }

    #[test]
    fn test_started_without_prior_motion_omits_gap() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(0), 0);
        let events = feed(&mut tracker, Some(2), 120);
        assert_eq!(
            events,
            vec![MotionEvent::Started {
                value: 2,
                since_last_motion: None
            }]
        );
    }

    #[test]
    fn test_started_after_short_gap_omits_gap() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(3), 0);
        feed(&mut tracker, Some(0), 10);
        let events = feed(&mut tracker, Some(3), 25);
        assert_eq!(
            events,
            vec![MotionEvent::Started {
                value: 3,
                since_last_motion: None
            }]
        );
    }

    #[test]
    fn test_started_gap_must_exceed_threshold() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(3), 0);
        feed(&mut tracker, Some(0), 5);
        // exactly 30s is not "more than" the threshold
        let events = feed(&mut tracker, Some(1), 30);
        assert_eq!(
            events,
            vec![MotionEvent::Started {
                value: 1,
                since_last_motion: None
            }]
        );
    }

    #[test]
    fn test_started_after_long_gap_reports_gap() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(3), 0);
        feed(&mut tracker, Some(0), 5);
        let events = feed(&mut tracker, Some(6), 125);
        assert_eq!(
            events,
            vec![MotionEvent::Started {
                value: 6,
                since_last_motion: Some(Duration::seconds(125))
            }]
        );
        assert_eq!(tracker.state().last_nonzero_at, Some(at(125)));
    }

    #[test]
    fn test_stopped() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(3), 0);
        assert_eq!(feed(&mut tracker, Some(0), 5), vec![MotionEvent::Stopped]);
        assert_eq!(tracker.state().last_nonzero_at, Some(at(0)));
        assert_eq!(tracker.state().last_change_at, Some(at(5)));
    }

    #[test]
    fn test_intensified_and_diminished() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(2), 0);
        assert_eq!(
            feed(&mut tracker, Some(5), 5),
            vec![MotionEvent::Intensified { from: 2, to: 5 }]
        );
        assert_eq!(
            feed(&mut tracker, Some(1), 10),
            vec![MotionEvent::Diminished { from: 5, to: 1 }]
        );
        assert_eq!(tracker.state().last_nonzero_at, Some(at(10)));
    }

    #[test]
    fn test_unchanged_positive_refreshes_last_nonzero_only() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(4), 0);
        assert!(feed(&mut tracker, Some(4), 20).is_empty());
        assert_eq!(tracker.state().last_nonzero_at, Some(at(20)));
        assert_eq!(tracker.state().last_change_at, Some(at(0)));
    }

    #[test]
    fn test_idle_reminder_needs_prior_motion() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(0), 0);
        for secs in (5..=300).step_by(5) {
            assert!(feed(&mut tracker, Some(0), secs).is_empty());
        }
    }

    #[test]
    fn test_idle_reminder_rate_limited() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(2), 0);
        feed(&mut tracker, Some(0), 5);

        let mut reminders = Vec::new();
        for secs in (10..=95).step_by(5) {
            for event in feed(&mut tracker, Some(0), secs) {
                reminders.push((secs, event));
            }
        }

        assert_eq!(
            reminders,
            vec![
                (
                    30,
                    MotionEvent::IdleReminder {
                        idle_for: Duration::seconds(30)
                    }
                ),
                (
                    60,
                    MotionEvent::IdleReminder {
                        idle_for: Duration::seconds(60)
                    }
                ),
                (
                    90,
                    MotionEvent::IdleReminder {
                        idle_for: Duration::seconds(90)
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_transition_clears_idle_notice() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(2), 0);
        feed(&mut tracker, Some(0), 5);
        feed(&mut tracker, Some(0), 40);
        assert_eq!(tracker.state().last_idle_notice_at, Some(at(40)));

        feed(&mut tracker, Some(1), 45);
        assert_eq!(tracker.state().last_idle_notice_at, None);
    }

    #[test]
    fn test_stop_then_reminder_after_threshold_from_last_motion() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(2), 0);
        feed(&mut tracker, Some(0), 20);
        // 30s since the last positive reading, only 10s since the stop
        assert_eq!(
            feed(&mut tracker, Some(0), 30),
            vec![MotionEvent::IdleReminder {
                idle_for: Duration::seconds(30)
            }]
        );
    }

    #[test]
    fn test_end_to_end_scenario() {
        // absent, 0, 0, 5, 5, 0 at 5s spacing, then 0 once 35s have passed
        // since the last positive reading.
        let script = [
            (None, 0),
            (Some(0), 5),
            (Some(0), 10),
            (Some(5), 15),
            (Some(5), 20),
            (Some(0), 25),
            (Some(0), 55),
        ];

        let mut tracker = MotionTracker::new();
        let produced: Vec<Vec<MotionEvent>> = script
            .iter()
            .map(|(value, secs)| feed(&mut tracker, *value, *secs))
            .collect();

        assert_eq!(
            produced,
            vec![
                vec![],
                vec![MotionEvent::InitialIdle],
                vec![],
                vec![MotionEvent::Started {
                    value: 5,
                    since_last_motion: None
                }],
                vec![],
                vec![MotionEvent::Stopped],
                vec![MotionEvent::IdleReminder {
                    idle_for: Duration::seconds(35)
                }],
            ]
        );
    }

    #[test]
    fn test_absent_between_readings_does_not_synthesize_transition() {
        let mut tracker = MotionTracker::new();
        feed(&mut tracker, Some(3), 0);
        assert!(feed(&mut tracker, None, 5).is_empty());
        assert!(feed(&mut tracker, Some(3), 10).is_empty());
    }
}
