use thiserror::Error;

/// Errors raised by the stopwatch domain itself. I/O and configuration
/// failures travel as `anyhow::Error` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Cannot edit the time while the timer is running; pause it first")]
    EditWhileRunning,

    #[error("{field} must be at most {max}, got {value}")]
    FieldOutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("Invalid time '{0}', expected S, M:SS or H:MM:SS with optional .mmm")]
    InvalidTime(String),
}

/// Errors from a line typed into the interactive loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}', type ? for help")]
    Unknown(String),

    #[error("Missing time, e.g. 'e 1:30' or 'e 01:02:03.004'")]
    MissingTime,

    #[error(transparent)]
    Timer(#[from] TimerError),
}
