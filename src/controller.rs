use crate::clock::Clock;
use crate::edit::TimeFields;
use crate::error::TimerError;
use crate::format::DisplayOptions;
use crate::state::Session;
use crate::stopwatch::Stopwatch;
use serde::Serialize;
use std::time::Duration;

/// Where the formatted time goes.
pub trait TimeDisplay {
    fn show(&mut self, text: &str);

    /// One-off message shown above the time, e.g. a rejected command.
    fn notice(&mut self, _text: &str) {}
}

/// Keeps every rendered label and notice in memory. One-shot commands use
/// it where no terminal is attached.
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    pub frames: Vec<String>,
    pub notices: Vec<String>,
}

impl RecordingDisplay {
    pub fn last(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
}

impl TimeDisplay for RecordingDisplay {
    fn show(&mut self, text: &str) {
        self.frames.push(text.to_string());
    }

    fn notice(&mut self, text: &str) {
        self.notices.push(text.to_string());
    }
}

/// A user-facing action and whether it can be triggered right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionState {
    pub label: &'static str,
    pub shortcut: &'static str,
    pub enabled: bool,
    /// `Some` for toggles.
    pub checked: Option<bool>,
}

/// Owns the stopwatch and display options and decides when to redraw.
///
/// While stopped, each state-changing action renders exactly once. While
/// running, rendering is left to [`Controller::tick`].
pub struct Controller<C: Clock, D: TimeDisplay> {
    stopwatch: Stopwatch<C>,
    options: DisplayOptions,
    display: D,
}

impl<C: Clock, D: TimeDisplay> Controller<C, D> {
    pub fn new(stopwatch: Stopwatch<C>, options: DisplayOptions, display: D) -> Self {
        let mut controller = Self {
            stopwatch,
            options,
            display,
        };
        controller.render();
        controller
    }

    /// Stopped controller showing the saved time and options of `session`.
    pub fn from_session(session: &Session, clock: C, display: D) -> Self {
        let stopwatch = Stopwatch::with_accumulated(clock, session.saved_time());
        Self::new(stopwatch, session.display_options(), display)
    }

    pub fn is_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    pub fn options(&self) -> DisplayOptions {
        self.options
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Shows `text` without touching the time label.
    pub fn notify(&mut self, text: &str) {
        self.display.notice(text);
    }

    pub fn label(&self) -> String {
        self.options.format(self.stopwatch.elapsed())
    }

    pub fn start_pause(&mut self) {
        self.stopwatch.toggle();
        if self.is_running() {
            tracing::debug!("Timer started");
        } else {
            tracing::debug!(elapsed = ?self.stopwatch.elapsed(), "Timer paused");
            self.render();
        }
    }

    pub fn reset(&mut self) {
        self.stopwatch.reset();
        tracing::debug!("Timer reset");
        self.render();
    }

    pub fn edit_time(&mut self, fields: TimeFields) -> Result<(), TimerError> {
        self.stopwatch.set_time(fields.to_duration())?;
        tracing::debug!(time = %fields, "Timer edited");
        self.render();
        Ok(())
    }

    pub fn toggle_show_milliseconds(&mut self) {
        self.options.show_milliseconds = !self.options.show_milliseconds;
        self.render_if_stopped();
    }

    pub fn toggle_show_full_format(&mut self) {
        self.options.show_full_format = !self.options.show_full_format;
        self.render_if_stopped();
    }

    /// Periodic refresh while running.
    pub fn tick(&mut self) {
        if self.is_running() {
            self.render();
        }
    }

    pub fn actions(&self) -> Vec<ActionState> {
        let running = self.is_running();
        vec![
            ActionState {
                label: if running { "Pause Timer" } else { "Start Timer" },
                shortcut: "s / 0",
                enabled: true,
                checked: None,
            },
            ActionState {
                label: "Reset Timer",
                shortcut: "r / 1",
                enabled: true,
                checked: None,
            },
            ActionState {
                label: "Edit Time",
                shortcut: "e <time>",
                enabled: !running,
                checked: None,
            },
            ActionState {
                label: "Show milliseconds",
                shortcut: "m",
                enabled: true,
                checked: Some(self.options.show_milliseconds),
            },
            ActionState {
                label: "Show Full HH:MM:SS",
                shortcut: "f",
                enabled: true,
                checked: Some(self.options.show_full_format),
            },
        ]
    }

    /// Copies what should survive this run into `session`.
    ///
    /// The saved time is written only when the timer is stopped or has a
    /// non-zero base; a running timer with a zero base keeps whatever was
    /// stored before.
    pub fn persist(&self, session: &mut Session) {
        session.set_display_options(self.options);

        let accumulated = self.stopwatch.accumulated();
        if !self.is_running() || accumulated > Duration::ZERO {
            session.set_saved_time(accumulated);
        }
    }

    fn render_if_stopped(&mut self) {
        if !self.is_running() {
            self.render();
        }
    }

    fn render(&mut self) {
        let label = self.label();
        self.display.show(&label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn controller() -> (ManualClock, Controller<ManualClock, RecordingDisplay>) {
        let clock = ManualClock::new();
        let stopwatch = Stopwatch::new(clock.clone());
        let controller = Controller::new(
            stopwatch,
            DisplayOptions::default(),
            RecordingDisplay::default(),
        );
        (clock, controller)
    }

    #[test]
    fn test_initial_render() {
        let (_, c) = controller();
        assert_eq!(c.display().frames, vec!["00:00:00"]);
    }

    #[test]
    fn test_start_does_not_render_pause_does() {
        let (clock, mut c) = controller();

        c.start_pause();
        assert_eq!(c.display().frames.len(), 1);

        clock.advance(Duration::from_millis(1500));
        c.start_pause();

        assert_eq!(c.display().frames.len(), 2);
        assert_eq!(c.display().last(), Some("00:00:01"));
        assert_eq!(c.elapsed(), Duration::from_millis(1500));
    }

    #[test]
    fn test_tick_renders_only_while_running() {
        let (clock, mut c) = controller();

        c.tick();
        assert_eq!(c.display().frames.len(), 1);

        c.start_pause();
        clock.advance(Duration::from_secs(65));
        c.tick();
        assert_eq!(c.display().last(), Some("00:01:05"));
    }

    #[test]
    fn test_toggles_render_once_when_stopped() {
        let (_, mut c) = controller();

        c.toggle_show_full_format();
        assert_eq!(c.display().last(), Some("0"));

        c.toggle_show_milliseconds();
        assert_eq!(c.display().last(), Some("0.000"));
        assert_eq!(c.display().frames.len(), 3);
    }

    #[test]
    fn test_toggles_do_not_render_while_running() {
        let (_, mut c) = controller();
        c.start_pause();
        c.toggle_show_milliseconds();
        assert_eq!(c.display().frames.len(), 1);
        assert!(c.options().show_milliseconds);
    }

    #[test]
    fn test_edit_time_while_stopped() {
        let (_, mut c) = controller();
        c.toggle_show_milliseconds();

        c.edit_time(TimeFields::new(1, 2, 3, 4).unwrap()).unwrap();

        assert_eq!(c.elapsed(), Duration::from_millis(3_723_004));
        assert_eq!(c.display().last(), Some("01:02:03.004"));
    }

    #[test]
    fn test_edit_time_rejected_while_running() {
        let (_, mut c) = controller();
        c.start_pause();
        let frames = c.display().frames.len();

        let result = c.edit_time(TimeFields::new(0, 1, 0, 0).unwrap());

        assert_eq!(result, Err(TimerError::EditWhileRunning));
        assert_eq!(c.display().frames.len(), frames);
    }

    #[test]
    fn test_reset_while_running_stops_and_renders_zero() {
        let (clock, mut c) = controller();
        c.start_pause();
        clock.advance(Duration::from_secs(3));

        c.reset();

        assert!(!c.is_running());
        assert_eq!(c.elapsed(), Duration::ZERO);
        assert_eq!(c.display().last(), Some("00:00:00"));
    }

    #[test]
    fn test_actions_reflect_state() {
        let (_, mut c) = controller();
        let actions = c.actions();
        assert_eq!(actions[0].label, "Start Timer");
        assert!(actions[2].enabled);
        assert_eq!(actions[4].checked, Some(true));

        c.start_pause();
        let actions = c.actions();
        assert_eq!(actions[0].label, "Pause Timer");
        assert!(!actions[2].enabled);
    }

    #[test]
    fn test_persist_when_stopped() {
        let (clock, mut c) = controller();
        c.start_pause();
        clock.advance(Duration::from_millis(2250));
        c.start_pause();
        c.toggle_show_milliseconds();

        let mut session = Session::default();
        c.persist(&mut session);

        assert_eq!(session.saved_seconds, 2.25);
        assert!(session.show_milliseconds);
    }

    #[test]
    fn test_persist_running_with_zero_base_keeps_previous_value() {
        let (clock, mut c) = controller();
        c.start_pause();
        clock.advance(Duration::from_secs(10));

        let mut session = Session {
            saved_seconds: 42.0,
            ..Session::default()
        };
        c.persist(&mut session);

        assert_eq!(session.saved_seconds, 42.0);
    }

    #[test]
    fn test_persist_running_with_base_saves_base_only() {
        let (clock, mut c) = controller();
        c.start_pause();
        clock.advance(Duration::from_secs(5));
        c.start_pause();
        c.start_pause();
        clock.advance(Duration::from_secs(7));

        let mut session = Session::default();
        c.persist(&mut session);

        assert_eq!(session.saved_seconds, 5.0);
    }

    #[test]
    fn test_from_session_restores() {
        let session = Session {
            show_milliseconds: true,
            show_full_format: false,
            saved_seconds: 65.5,
            ..Session::default()
        };

        let c = Controller::from_session(
            &session,
            ManualClock::new(),
            RecordingDisplay::default(),
        );

        assert!(!c.is_running());
        assert_eq!(c.display().frames, vec!["1:05.500"]);
    }
}
