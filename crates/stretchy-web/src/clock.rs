#![forbid(unsafe_code)]

//! Monotonic host clock.
//!
//! Animation frames carry their own timestamp while input events read
//! `performance.now()`. The two sources can interleave slightly out of
//! order, so the clock never moves backwards: an earlier reading returns the
//! latest time already observed.

use std::time::Duration;

/// Convert a host millisecond reading to a [`Duration`]. Negative and
/// non-finite readings map to zero.
#[must_use]
pub fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// Clock fed by host timestamps.
#[derive(Debug, Default, Clone)]
pub struct HostClock {
    now: Duration,
}

impl HostClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Feed a reading in milliseconds and return the current time.
    pub fn observe(&mut self, ms: f64) -> Duration {
        let reading = duration_from_ms(ms);
        if reading > self.now {
            self.now = reading;
        }
        self.now
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}
