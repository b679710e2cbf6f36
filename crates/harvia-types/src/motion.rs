//! Motion state and event types.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Summary of everything observed so far, as retained by the tracker.
///
/// All fields start empty. Only the tracker mutates this value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionState {
    /// Last presence value that was observed.
    pub last_value: Option<u32>,
    /// When `last_value` last changed.
    pub last_change_at: Option<OffsetDateTime>,
    /// When a positive reading was last observed.
    pub last_nonzero_at: Option<OffsetDateTime>,
    /// When the last idle reminder was emitted.
    pub last_idle_notice_at: Option<OffsetDateTime>,
}

impl MotionState {
    /// The phase this state is in.
    #[must_use]
    pub fn phase(&self) -> MotionPhase {
        match self.last_value {
            None => MotionPhase::Unknown,
            Some(0) => MotionPhase::Idle,
            Some(_) => MotionPhase::Active,
        }
    }
}

/// Coarse motion phase derived from [`MotionState::last_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotionPhase {
    /// No reading observed yet.
    Unknown,
    /// Last reading was zero.
    Idle,
    /// Last reading was positive.
    Active,
}

impl fmt::Display for MotionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionPhase::Unknown => write!(f, "unknown"),
            MotionPhase::Idle => write!(f, "idle"),
            MotionPhase::Active => write!(f, "active"),
        }
    }
}

/// A classified motion event.
///
/// Events are produced by the tracker and consumed immediately by the
/// presenter; they are not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum MotionEvent {
    /// First observation was zero.
    InitialIdle,
    /// First observation was positive.
    InitialActive {
        /// Observed intensity.
        value: u32,
    },
    /// Motion resumed after an idle period.
    Started {
        /// Observed intensity.
        value: u32,
        /// Time since the previous positive reading, when longer than the
        /// motion gap threshold.
        since_last_motion: Option<Duration>,
    },
    /// Motion dropped to zero.
    Stopped,
    /// Motion intensity rose.
    Intensified {
        /// Previous intensity.
        from: u32,
        /// New intensity.
        to: u32,
    },
    /// Motion intensity fell but stayed positive.
    Diminished {
        /// Previous intensity.
        from: u32,
        /// New intensity.
        to: u32,
    },
    /// Rate-limited reminder while motion stays at zero.
    IdleReminder {
        /// Time since the last positive reading.
        idle_for: Duration,
    },
}

impl MotionEvent {
    /// Whether this event reflects a change of presence value.
    #[must_use]
    pub fn is_transition(&self) -> bool {
        !matches!(self, MotionEvent::IdleReminder { .. })
    }
}
