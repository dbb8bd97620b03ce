use crate::controller::TimeDisplay;
use crate::style::LabelStyle;
use std::io::{self, Write};

const CLEAR_LINE: &str = "\r\x1b[2K";

/// Redraws the time on a single terminal line.
pub struct TerminalDisplay<W: Write> {
    out: W,
    style: Option<LabelStyle>,
    last: String,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, style: Option<LabelStyle>) -> Self {
        Self {
            out,
            style: style.filter(|s| !s.is_plain()),
            last: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) {
        let painted = match &self.style {
            Some(style) => style.apply(&self.last).to_string(),
            None => self.last.clone(),
        };
        let result = write!(self.out, "{}{}", CLEAR_LINE, painted).and_then(|_| self.out.flush());
        log_write_error(result);
    }
}

// Display output is best effort.
fn log_write_error(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::trace!("Display write failed: {}", e);
    }
}

impl<W: Write> TimeDisplay for TerminalDisplay<W> {
    fn show(&mut self, text: &str) {
        if text == self.last {
            return;
        }
        self.last = text.to_string();
        self.draw();
    }

    fn notice(&mut self, text: &str) {
        log_write_error(writeln!(self.out, "{}{}", CLEAR_LINE, text));
        self.draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(display: TerminalDisplay<Vec<u8>>) -> String {
        String::from_utf8(display.into_inner()).unwrap()
    }

    #[test]
    fn test_show_redraws_in_place() {
        let mut display = TerminalDisplay::new(Vec::new(), None);
        display.show("0");
        display.show("1");
        assert_eq!(output(display), "\r\x1b[2K0\r\x1b[2K1");
    }

    #[test]
    fn test_identical_frames_are_skipped() {
        let mut display = TerminalDisplay::new(Vec::new(), None);
        display.show("00:00:01");
        display.show("00:00:01");
        assert_eq!(output(display), "\r\x1b[2K00:00:01");
    }

    #[test]
    fn test_notice_keeps_time_visible() {
        let mut display = TerminalDisplay::new(Vec::new(), None);
        display.show("5");
        display.notice("nope");
        assert_eq!(output(display), "\r\x1b[2K5\r\x1b[2Knope\n\r\x1b[2K5");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_write_failures_do_not_interrupt_display() {
        let mut display = TerminalDisplay::new(ClosedPipe, None);
        display.show("1");
        display.notice("nope");
        display.show("2");
        assert_eq!(display.last, "2");
    }
}
