//! Manual time entry.
//!
//! [`TimeFields`] is the four-field value an "edit time" form collects. Range
//! checks live here, at the input boundary; the stopwatch accepts any
//! duration it is given.

use crate::error::TimerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const MILLIS_PER_SECOND: u128 = 1_000;
const MILLIS_PER_MINUTE: u128 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u128 = 60 * MILLIS_PER_MINUTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeFields {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
}

impl TimeFields {
    /// Builds a validated value.
    pub fn new(
        hours: u64,
        minutes: u64,
        seconds: u64,
        milliseconds: u64,
    ) -> Result<Self, TimerError> {
        let fields = Self {
            hours,
            minutes,
            seconds,
            milliseconds,
        };
        fields.validate()?;
        Ok(fields)
    }

    pub fn validate(&self) -> Result<(), TimerError> {
        check_range("minutes", self.minutes, 59)?;
        check_range("seconds", self.seconds, 59)?;
        check_range("milliseconds", self.milliseconds, 999)?;
        Ok(())
    }

    /// Splits a duration by successive truncating division. Anything below a
    /// millisecond is dropped.
    pub fn from_duration(duration: Duration) -> Self {
        let total = duration.as_millis();
        let hours = total / MILLIS_PER_HOUR;
        let rest = total % MILLIS_PER_HOUR;

        Self {
            hours: u64::try_from(hours).unwrap_or(u64::MAX),
            minutes: (rest / MILLIS_PER_MINUTE) as u64,
            seconds: (rest % MILLIS_PER_MINUTE / MILLIS_PER_SECOND) as u64,
            milliseconds: (rest % MILLIS_PER_SECOND) as u64,
        }
    }

    /// `hours*3600 + minutes*60 + seconds` plus `milliseconds/1000`, exactly.
    pub fn to_duration(&self) -> Duration {
        let secs = self
            .hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds);
        Duration::from_secs(secs).saturating_add(Duration::from_millis(self.milliseconds))
    }
}

fn check_range(field: &'static str, value: u64, max: u64) -> Result<(), TimerError> {
    if value > max {
        return Err(TimerError::FieldOutOfRange { field, value, max });
    }
    Ok(())
}

impl From<Duration> for TimeFields {
    fn from(duration: Duration) -> Self {
        Self::from_duration(duration)
    }
}

impl fmt::Display for TimeFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02}:{:02}.{:03}",
            self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

/// Parses `S`, `M:SS` or `H:MM:SS`, each optionally followed by `.mmm`.
/// This is the same shape the formatter produces, so displayed values can be
/// typed back in.
impl FromStr for TimeFields {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || TimerError::InvalidTime(input.to_string());

        let (clock_part, millis) = match input.split_once('.') {
            Some((clock, ms)) => {
                if ms.len() != 3 {
                    return Err(invalid());
                }
                (clock, parse_number(ms).ok_or_else(invalid)?)
            }
            None => (input, 0),
        };

        let parts = clock_part
            .split(':')
            .map(parse_number)
            .collect::<Option<Vec<u64>>>()
            .ok_or_else(invalid)?;

        let (hours, minutes, seconds) = match parts.as_slice() {
            [s] => (0, 0, *s),
            [m, s] => (0, *m, *s),
            [h, m, s] => (*h, *m, *s),
            _ => return Err(invalid()),
        };

        Self::new(hours, minutes, seconds, millis)
    }
}

fn parse_number(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
