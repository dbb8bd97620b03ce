use crate::edit::TimeFields;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How elapsed time is rendered. Persisted with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub show_milliseconds: bool,
    /// Always render `HH:MM:SS`, even below one hour.
    pub show_full_format: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_milliseconds: false,
            show_full_format: true,
        }
    }
}

impl DisplayOptions {
    pub fn format(&self, duration: Duration) -> String {
        format(duration, self.show_milliseconds, self.show_full_format)
    }
}

/// Renders a duration as `HH:MM:SS`, `M:SS` or `S`, optionally with `.mmm`.
///
/// The full form is used whenever `show_full_format` is set or the value
/// reaches an hour. Padding widths are minimums: 100 hours renders as
/// `100:00:00`.
pub fn format(duration: Duration, show_milliseconds: bool, show_full_format: bool) -> String {
    let TimeFields {
        hours,
        minutes,
        seconds,
        milliseconds,
    } = TimeFields::from_duration(duration);

    let mut label = if show_full_format || hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}:{:02}", minutes, seconds)
    } else {
        seconds.to_string()
    };

    if show_milliseconds {
        label.push_str(&format!(".{:03}", milliseconds));
    }

    label
}
