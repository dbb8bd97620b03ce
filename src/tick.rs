use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Periodic display refresh that exists only while the timer runs.
///
/// Cancelling drops the underlying interval, so a stopped timer schedules no
/// wakeups at all.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Starts or cancels the interval to match `running`. Must be called
    /// from within a tokio runtime.
    pub fn sync(&mut self, running: bool) {
        match (running, self.interval.is_some()) {
            (true, false) => {
                let mut ticks = interval(self.period);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.interval = Some(ticks);
                tracing::trace!(period = ?self.period, "Ticker started");
            }
            (false, true) => {
                self.interval = None;
                tracing::trace!("Ticker cancelled");
            }
            _ => {}
        }
    }

    /// Waits for the next tick. Never completes while cancelled.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(ticks) => {
                ticks.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, timeout};

    #[tokio::test(start_paused = true)]
    async fn test_sync_starts_and_cancels() {
        let mut ticker = Ticker::new(Duration::from_millis(2));
        assert!(!ticker.is_active());

        ticker.sync(true);
        assert!(ticker.is_active());

        ticker.sync(true);
        assert!(ticker.is_active());

        ticker.sync(false);
        assert!(!ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_period() {
        let mut ticker = Ticker::new(Duration::from_millis(2));
        ticker.sync(true);

        let start = Instant::now();
        ticker.tick().await; // first tick completes immediately
        ticker.tick().await;
        ticker.tick().await;

        assert_eq!(start.elapsed(), Duration::from_millis(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_ticker_never_fires() {
        let mut ticker = Ticker::new(Duration::from_millis(2));
        ticker.sync(true);
        ticker.sync(false);

        let waited = timeout(Duration::from_secs(1), ticker.tick()).await;
        assert!(waited.is_err());
    }
}
