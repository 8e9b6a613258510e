//! Periodic tick source over crossbeam channels.
//!
//! Wraps [`crossbeam_channel::tick`] behind arm/disarm so a runner loop
//! can `select!` over ticks and commands uniformly. Disarmed, the tick
//! slot holds a [`never`] channel and the select arm simply goes silent;
//! there is no timer handle to cancel and no callback left in flight.
//!
//! Re-arming swaps in a fresh tick channel, so the first tick lands one
//! full interval after the arm and any tick queued from an earlier run
//! is dropped with the old channel.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, never, tick};
use log::trace;

/// Arm/disarm wrapper around a periodic channel.
pub struct Ticker {
    interval: Duration,
    channel: Receiver<Instant>,
    armed: bool,
}

impl Ticker {
    /// Create a disarmed ticker with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            channel: never(),
            armed: false,
        }
    }

    /// Start ticking. No-op if already armed (an in-flight run keeps
    /// its phase).
    pub fn arm(&mut self) {
        if !self.armed {
            trace!("Ticker armed at {:?}", self.interval);
            self.channel = tick(self.interval);
            self.armed = true;
        }
    }

    /// Stop ticking. Pending ticks die with the dropped channel.
    pub fn disarm(&mut self) {
        if self.armed {
            trace!("Ticker disarmed");
            self.channel = never();
            self.armed = false;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Channel to select on. A `never` channel while disarmed.
    pub fn channel(&self) -> &Receiver<Instant> {
        &self.channel
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("interval", &self.interval)
            .field("armed", &self.armed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SHORT: Duration = Duration::from_millis(2);
    const WAIT: Duration = Duration::from_millis(250);

    #[test]
    fn test_disarmed_never_fires() {
        let ticker = Ticker::new(SHORT);
        assert!(!ticker.is_armed());
        assert_eq!(ticker.interval(), SHORT);
        assert!(
            ticker
                .channel()
                .recv_timeout(Duration::from_millis(20))
                .is_err()
        );
    }

    #[test]
    fn test_armed_fires() {
        let mut ticker = Ticker::new(SHORT);
        ticker.arm();
        assert!(ticker.is_armed());
        assert!(ticker.channel().recv_timeout(WAIT).is_ok());
    }

    #[test]
    fn test_disarm_goes_silent() {
        let mut ticker = Ticker::new(SHORT);
        ticker.arm();
        assert!(ticker.channel().recv_timeout(WAIT).is_ok());

        ticker.disarm();
        assert!(
            ticker
                .channel()
                .recv_timeout(Duration::from_millis(20))
                .is_err()
        );
    }

    #[test]
    fn test_rearm_after_disarm() {
        let mut ticker = Ticker::new(SHORT);
        ticker.arm();
        ticker.disarm();
        ticker.arm();
        assert!(ticker.channel().recv_timeout(WAIT).is_ok());
    }

    #[test]
    fn test_arm_while_armed_keeps_phase() {
        let mut ticker = Ticker::new(SHORT);
        ticker.arm();
        let before = ticker.channel().clone();
        ticker.arm();
        // Same underlying channel: arming twice must not reset the cadence
        assert!(before.same_channel(ticker.channel()));
    }
}
