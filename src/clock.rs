use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, tick};

/// Cancellable repeating ticker that drives the playback cursor.
///
/// Backed by a `crossbeam` tick channel, which holds at most one pending
/// message: if the consumer stalls past a period, missed ticks coalesce into
/// a single catch-up instead of queueing without bound. Dropping the handle
/// cancels the ticker, so tying one to a playback session guarantees release
/// on every exit path from the playing state.
pub struct CursorClock {
    ticks: Receiver<Instant>,
    period: Duration,
}

impl CursorClock {
    pub fn start(period: Duration) -> Self {
        Self {
            ticks: tick(period),
            period,
        }
    }

    pub fn ticks(&self) -> &Receiver<Instant> {
        &self.ticks
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn ticks_arrive_at_the_period() {
        let clock = CursorClock::start(Duration::from_millis(5));
        assert!(clock.ticks().recv_timeout(Duration::from_secs(1)).is_ok());
        assert!(clock.ticks().recv_timeout(Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn stalled_consumer_sees_at_most_one_pending_tick() {
        let clock = CursorClock::start(Duration::from_millis(5));
        thread::sleep(Duration::from_millis(40));
        assert_eq!(clock.ticks().try_iter().count(), 1);
    }
}
