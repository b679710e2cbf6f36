//! The polling loop.
//!
//! A [`Monitor`] owns a [`PresenceSource`] and a [`MotionTracker`]. Each tick
//! fetches one reading, feeds it to the tracker and hands the outcome to a
//! caller-supplied reporter. After every tick, failed or not, the loop waits
//! the full poll interval before starting the next one.

use std::time::Duration;

use harvia_types::{MotionEvent, Reading};
use time::OffsetDateTime;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::motion::MotionTracker;
use crate::traits::PresenceSource;

/// Default delay between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Consecutive failures after which the loop stops logging each one.
const QUIET_AFTER_FAILURES: u32 = 4;

/// Outcome of one tick.
pub type TickResult = Result<Vec<MotionEvent>>;

/// What the loop does after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Wait for the next interval and poll again.
    Continue,
    /// Stop the loop and return the error.
    Terminate,
}

/// Decide whether the loop keeps going after `result`.
///
/// Successful ticks and recoverable failures continue. Anything else ends
/// the loop.
#[must_use]
pub fn policy(result: &TickResult) -> Flow {
    match result {
        Ok(_) => Flow::Continue,
        Err(e) if e.is_recoverable() => Flow::Continue,
        Err(_) => Flow::Terminate,
    }
}

/// Whether the loop is still polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Polls a presence source and classifies the readings.
#[derive(Debug)]
pub struct Monitor<S> {
    source: S,
    tracker: MotionTracker,
    poll_interval: Duration,
    consecutive_failures: u32,
    state: LoopState,
}

impl<S: PresenceSource> Monitor<S> {
    /// Create a monitor polling `source` every `poll_interval`.
    ///
    /// Returns [`Error::InvalidConfig`] for a zero interval.
    pub fn new(source: S, poll_interval: Duration) -> Result<Self> {
        if poll_interval.is_zero() {
            return Err(Error::invalid_config("poll interval must be positive"));
        }
        Ok(Self {
            source,
            tracker: MotionTracker::new(),
            poll_interval,
            consecutive_failures: 0,
            state: LoopState::Running,
        })
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The motion tracker.
    pub fn tracker(&self) -> &MotionTracker {
        &self.tracker
    }

    /// Delay between the end of one tick and the start of the next.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Failed ticks since the last successful one.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Whether [`Monitor::run`] is still polling.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run a single poll at `now`.
    ///
    /// On failure the tracker is left untouched.
    pub async fn tick(&mut self, now: OffsetDateTime) -> TickResult {
        match self.source.fetch_presence(now).await {
            Ok(value) => {
                self.record_success();
                Ok(self.tracker.observe(Reading::new(value, now)))
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Poll until cancelled or until a tick fails with a non-recoverable
    /// error.
    ///
    /// The first tick runs immediately; each later tick starts one poll
    /// interval after the previous one was reported, however long its fetch
    /// took. `report` is called with the tick time and outcome of every
    /// completed tick. Cancellation is honoured both while waiting and while
    /// a fetch is in flight; an interrupted fetch is not reported.
    pub async fn run<F>(&mut self, cancel: CancellationToken, mut report: F) -> Result<()>
    where
        F: FnMut(OffsetDateTime, &TickResult),
    {
        info!(
            "Monitoring {} every {}s",
            self.source.device(),
            self.poll_interval.as_secs()
        );

        self.state = LoopState::Running;

        let outcome = loop {
            let now = OffsetDateTime::now_utc();
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => break Ok(()),
                result = self.tick(now) => result,
            };

            report(now, &result);

            if policy(&result) == Flow::Terminate {
                break result.map(|_| ());
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break Ok(()),
                _ = sleep(self.poll_interval) => {}
            }
        };

        self.state = LoopState::Stopped;
        match &outcome {
            Ok(()) => info!("Monitor stopped"),
            Err(e) => error!("Monitor stopped: {}", e),
        }
        outcome
    }

    fn record_success(&mut self) {
        if self.consecutive_failures >= QUIET_AFTER_FAILURES {
            info!(
                "Polling {} recovered after {} failed attempts",
                self.source.device(),
                self.consecutive_failures
            );
        }
        self.consecutive_failures = 0;
    }

    fn record_failure(&mut self, e: &Error) {
        self.consecutive_failures += 1;
        if self.consecutive_failures == QUIET_AFTER_FAILURES {
            error!(
                "Polling {} failed {} times in a row, will keep trying",
                self.source.device(),
                self.consecutive_failures
            );
        } else {
            debug!(
                "Poll of {} failed: {} (attempt {})",
                self.source.device(),
                e,
                self.consecutive_failures
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::mock::MockPresenceSource;
    use async_trait::async_trait;
    use harvia_types::{DeviceRef, MotionState};
    use tokio::time::Instant;

    /// Source whose every fetch takes `delay` before answering.
    struct SlowSource {
        device: DeviceRef,
        delay: Duration,
        fail: bool,
        started: Vec<Instant>,
        finished: usize,
    }

    impl SlowSource {
        fn new(delay: Duration, fail: bool) -> Self {
            Self {
                device: DeviceRef {
                    device_id: "sauna".to_string(),
                },
                delay,
                fail,
                started: Vec::new(),
                finished: 0,
            }
        }
    }

    #[async_trait]
    impl PresenceSource for SlowSource {
        fn device(&self) -> &DeviceRef {
            &self.device
        }

        async fn fetch_presence(&mut self, _now: OffsetDateTime) -> Result<Option<u32>> {
            self.started.push(Instant::now());
            sleep(self.delay).await;
            self.finished += 1;
            if self.fail {
                Err(fetch_error())
            } else {
                Ok(Some(1))
            }
        }
    }

    fn fetch_error() -> Error {
        Error::Fetch(ApiError::Status {
            status: 500,
            message: "internal".to_string(),
        })
    }

    #[test]
    fn test_policy() {
        assert_eq!(policy(&Ok(vec![])), Flow::Continue);
        assert_eq!(policy(&Err(fetch_error())), Flow::Continue);
        assert_eq!(
            policy(&Err(Error::Refresh(ApiError::MissingField("idToken")))),
            Flow::Continue
        );
        assert_eq!(policy(&Err(Error::NoDevice)), Flow::Terminate);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = Monitor::new(MockPresenceSource::new("sauna"), Duration::ZERO);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_tick_classifies_readings() {
        let source = MockPresenceSource::new("sauna").with_value(0).with_value(3);
        let mut monitor = Monitor::new(source, DEFAULT_POLL_INTERVAL).unwrap();
        let t0 = OffsetDateTime::now_utc();

        let events = monitor.tick(t0).await.unwrap();
        assert_eq!(events, vec![MotionEvent::InitialIdle]);

        let events = monitor.tick(t0 + time::Duration::seconds(5)).await.unwrap();
        assert_eq!(
            events,
            vec![MotionEvent::Started {
                value: 3,
                since_last_motion: None
            }]
        );
    }

    #[tokio::test]
    async fn test_failed_tick_leaves_tracker_untouched() {
        let source = MockPresenceSource::new("sauna")
            .with_value(2)
            .with_error(fetch_error());
        let mut monitor = Monitor::new(source, DEFAULT_POLL_INTERVAL).unwrap();
        let t0 = OffsetDateTime::now_utc();

        monitor.tick(t0).await.unwrap();
        let before = *monitor.tracker().state();

        assert!(monitor.tick(t0 + time::Duration::seconds(5)).await.is_err());
        assert_eq!(*monitor.tracker().state(), before);
        assert_eq!(monitor.consecutive_failures(), 1);
    }

    #[tokio::test]
    async fn test_failure_counter_resets_on_success() {
        let source = MockPresenceSource::new("sauna")
            .with_error(fetch_error())
            .with_error(fetch_error())
            .with_error(fetch_error())
            .with_error(fetch_error())
            .with_error(fetch_error())
            .with_value(1);
        let mut monitor = Monitor::new(source, DEFAULT_POLL_INTERVAL).unwrap();
        let now = OffsetDateTime::now_utc();

        for _ in 0..5 {
            assert!(monitor.tick(now).await.is_err());
        }
        assert_eq!(monitor.consecutive_failures(), 5);
        monitor.tick(now).await.unwrap();
        assert_eq!(monitor.consecutive_failures(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_continues_after_recoverable_failure() {
        let source = MockPresenceSource::new("sauna")
            .with_value(0)
            .with_error(fetch_error())
            .with_value(4);
        let mut monitor = Monitor::new(source, DEFAULT_POLL_INTERVAL).unwrap();
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        let mut outcomes = Vec::new();
        let mut instants = Vec::new();
        let result = monitor
            .run(cancel, |_, result| {
                outcomes.push(result.as_ref().map(Vec::clone).map_err(|e| e.to_string()));
                instants.push(Instant::now());
                if outcomes.len() == 3 {
                    stop.cancel();
                }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(monitor.state(), LoopState::Stopped);
        assert_eq!(monitor.source().calls(), 3);
        assert_eq!(outcomes[0], Ok(vec![MotionEvent::InitialIdle]));
        assert!(outcomes[1].is_err());
        assert_eq!(
            outcomes[2],
            Ok(vec![MotionEvent::Started {
                value: 4,
                since_last_motion: None
            }])
        );

        // Fixed cadence regardless of the failure in between.
        assert_eq!(instants[1] - instants[0], DEFAULT_POLL_INTERVAL);
        assert_eq!(instants[2] - instants[1], DEFAULT_POLL_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_terminates_on_fatal_error() {
        let source = MockPresenceSource::new("sauna")
            .with_value(1)
            .with_error(Error::NoDevice)
            .with_value(2);
        let mut monitor = Monitor::new(source, DEFAULT_POLL_INTERVAL).unwrap();

        let mut reports = 0;
        let result = monitor
            .run(CancellationToken::new(), |_, _| reports += 1)
            .await;

        assert!(matches!(result, Err(Error::NoDevice)));
        assert_eq!(reports, 2);
        assert_eq!(monitor.source().remaining(), 1);
        assert_eq!(monitor.state(), LoopState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cancelled_before_start_does_not_poll() {
        let mut monitor =
            Monitor::new(MockPresenceSource::new("sauna"), DEFAULT_POLL_INTERVAL).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut reports = 0;
        monitor.run(cancel, |_, _| reports += 1).await.unwrap();

        assert_eq!(reports, 0);
        assert_eq!(monitor.source().calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cancelled_while_waiting() {
        let source = MockPresenceSource::new("sauna").with_value(0);
        let mut monitor = Monitor::new(source, Duration::from_secs(60)).unwrap();
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            stop.cancel();
        });

        let started = Instant::now();
        let mut reports = 0;
        monitor.run(cancel, |_, _| reports += 1).await.unwrap();

        assert_eq!(reports, 1);
        assert_eq!(monitor.source().calls(), 1);
        assert!(Instant::now() - started < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_full_interval_after_slow_fetch() {
        let source = SlowSource::new(Duration::from_secs(10), true);
        let mut monitor = Monitor::new(source, DEFAULT_POLL_INTERVAL).unwrap();
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        let mut reports = 0;
        monitor
            .run(cancel, |_, result| {
                assert!(result.is_err());
                reports += 1;
                if reports == 3 {
                    stop.cancel();
                }
            })
            .await
            .unwrap();

        let started = &monitor.source().started;
        assert_eq!(started.len(), 3);
        // Fetch time plus the whole interval, never back to back.
        let expected = Duration::from_secs(10) + DEFAULT_POLL_INTERVAL;
        assert_eq!(started[1] - started[0], expected);
        assert_eq!(started[2] - started[1], expected);
        assert_eq!(monitor.consecutive_failures(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cancelled_during_fetch() {
        let source = SlowSource::new(Duration::from_secs(30), false);
        let mut monitor = Monitor::new(source, DEFAULT_POLL_INTERVAL).unwrap();
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        tokio::spawn(async move {
            sleep(Duration::from_secs(3)).await;
            stop.cancel();
        });

        let started = Instant::now();
        let mut reports = 0;
        monitor.run(cancel, |_, _| reports += 1).await.unwrap();

        assert_eq!(reports, 0);
        assert_eq!(monitor.state(), LoopState::Stopped);
        assert_eq!(monitor.source().started.len(), 1);
        assert_eq!(monitor.source().finished, 0);
        assert_eq!(*monitor.tracker().state(), MotionState::default());
        assert!(Instant::now() - started < Duration::from_secs(30));
    }
}
