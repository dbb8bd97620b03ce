use crate::clock::Clock;
use crate::error::TimerError;
use std::time::{Duration, Instant};

/// Elapsed-time accumulator.
///
/// `accumulated` holds every completed run segment. While running,
/// `started_at` marks the beginning of the current segment, which is only
/// folded into `accumulated` on pause.
#[derive(Debug, Clone)]
pub struct Stopwatch<C: Clock> {
    clock: C,
    accumulated: Duration,
    started_at: Option<Instant>,
}

impl<C: Clock> Stopwatch<C> {
    pub fn new(clock: C) -> Self {
        Self::with_accumulated(clock, Duration::ZERO)
    }

    /// A stopped stopwatch showing `accumulated`, e.g. restored from disk.
    pub fn with_accumulated(clock: C, accumulated: Duration) -> Self {
        Self {
            clock,
            accumulated,
            started_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time accrued by completed run segments only.
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
        }
    }

    pub fn pause(&mut self) {
        if let Some(start) = self.started_at.take() {
            let segment = self.clock.now().saturating_duration_since(start);
            self.accumulated = self.accumulated.saturating_add(segment);
        }
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stops the clock and discards all accrued time, including the
    /// segment in progress.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    pub fn set_time(&mut self, duration: Duration) -> Result<(), TimerError> {
        if self.is_running() {
            return Err(TimerError::EditWhileRunning);
        }
        self.accumulated = duration;
        Ok(())
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(start) => self
                .accumulated
                .saturating_add(self.clock.now().saturating_duration_since(start)),
            None => self.accumulated,
        }
    }
}

/// Converts float seconds into a duration, clamping to `[0, Duration::MAX]`.
///
/// The fractional part is rounded to the nearest nanosecond so that values
/// written with `as_secs_f64` come back with the same milliseconds.
pub fn duration_from_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    if secs >= u64::MAX as f64 {
        return Duration::MAX;
    }
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1e9).round() as u64;
    Duration::from_secs(whole as u64).saturating_add(Duration::from_nanos(nanos))
}
