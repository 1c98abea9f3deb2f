//! Run timing: a stopwatch and a manual speed calculator.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::history::{ActivityKind, History, TimedActivityRecord};

/// Shown when the calculator is missing an input.
pub const MISSING_SPEED_INPUTS: &str = "Enter distance and time.";

/// Convert meters per second to kilometers per hour.
#[must_use]
pub fn to_kmh(speed_mps: f64) -> f64 {
    speed_mps * 3.6
}

/// A start/stop stopwatch.
#[derive(Debug, Default)]
pub struct RunTimer {
    started: Option<Instant>,
}

impl RunTimer {
    /// A stopped timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) timing.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Whether the timer is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Time since start, or `None` when stopped.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.started.map(|s| s.elapsed())
    }

    /// Stop and return the elapsed time. Stopping a stopped timer does nothing.
    pub fn stop(&mut self) -> Option<Duration> {
        self.started.take().map(|s| s.elapsed())
    }
}

/// Record a stopwatch run.
///
/// A run with no distance is timed but not recorded, so this returns
/// `Ok(None)` when `distance` is not positive.
///
/// # Errors
///
/// Returns an error if the elapsed time is zero or the write fails.
pub fn finish_run(
    history: &History<'_>,
    distance: f64,
    elapsed: Duration,
) -> Result<Option<TimedActivityRecord>> {
    if !(distance.is_finite() && distance > 0.0) {
        return Ok(None);
    }
    let record = TimedActivityRecord::new(ActivityKind::Run, distance, elapsed.as_secs_f64())?;
    history.record(record).map(Some)
}

/// Compute and record a speed from hand-entered distance and time.
///
/// # Errors
///
/// Returns a validation error unless both inputs are positive, or a storage error.
pub fn manual_speed(
    history: &History<'_>,
    distance: f64,
    seconds: f64,
) -> Result<TimedActivityRecord> {
    let record = TimedActivityRecord::new(ActivityKind::RunManual, distance, seconds)
        .map_err(|_| Error::validation(MISSING_SPEED_INPUTS))?;
    history.record(record)
}
