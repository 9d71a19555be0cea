use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use crate::Clock;

/// Host timer backed by [`Instant`] and [`std::thread::sleep`].
///
/// Counts microseconds since construction; the count wraps after about 71 minutes.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    epoch: Instant,
}

impl StdClock {
    /// Creates a clock starting at zero.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_us(&mut self) -> u32 {
        // truncation is the wrap
        self.epoch.elapsed().as_micros() as u32
    }
}

impl DelayNs for StdClock {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns.into()));
    }
}
