//! Elapsed-time tracking for a test.

use std::time::Duration;

use chrono::{DateTime, Utc};
use quiz_core::Clock;
use quiz_core::time::{format_elapsed, whole_seconds_between};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Display refresh cadence.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Elapsed-seconds counter derived from a start instant and the clock.
///
/// `start` always restarts from zero; once stopped the value is frozen.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    clock: Clock,
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
}

impl Timer {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            started_at: None,
            stopped_at: None,
        }
    }

    pub fn start(&mut self) -> DateTime<Utc> {
        let now = self.clock.now();
        self.started_at = Some(now);
        self.stopped_at = None;
        now
    }

    /// Freeze the counter. Returns `false` if it was not running.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.stopped_at = Some(self.clock.now());
        true
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.stopped_at.is_none()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn stopped_at(&self) -> Option<DateTime<Utc>> {
        self.stopped_at
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        match (self.started_at, self.stopped_at) {
            (Some(start), Some(stop)) => whole_seconds_between(start, stop),
            (Some(start), None) => whole_seconds_between(start, self.clock.now()),
            (None, _) => 0,
        }
    }

    /// Elapsed time as `MM:SS`.
    #[must_use]
    pub fn label(&self) -> String {
        format_elapsed(self.elapsed_seconds())
    }
}

/// Background task sampling a running timer on a fixed cadence.
///
/// Must be created inside a tokio runtime. Dropping the handle stops it.
#[derive(Debug)]
pub struct TimerTicker {
    handle: JoinHandle<()>,
}

impl TimerTicker {
    /// Spawn a task that calls `on_tick` with the elapsed seconds every `period`.
    pub fn spawn<F>(timer: &Timer, period: Duration, on_tick: F) -> Self
    where
        F: Fn(u64) + Send + 'static,
    {
        let sampled = *timer;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                on_tick(sampled.elapsed_seconds());
            }
        });
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TimerTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
