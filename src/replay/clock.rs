//! Monotonic clock abstraction for the replay scheduler.
//!
//! The scheduler needs two things: a monotonic microsecond reading that never
//! resets, and a short fixed-granularity sleep for the spin-wait. Putting
//! them behind a trait lets the scheduler's arithmetic run against a manual
//! clock in tests without real sleeping.

use std::time::{Duration, Instant};

/// Sleep granularity of the spin-wait, in nanoseconds. OS sleep guarantees
/// are too coarse for microsecond pacing, so the scheduler sleeps this long
/// and re-checks the clock instead of issuing one long sleep.
pub const SPIN_SLEEP_NANOS: u64 = 1_000;

/// Monotonic time source with a spin-granularity sleep.
pub trait MonotonicClock {
    /// Microseconds since an arbitrary fixed origin. Never decreases.
    fn now_micros(&self) -> i64;

    /// Block for one spin-wait step.
    fn spin_sleep(&self);
}

/// Production clock: `Instant` anchored at construction.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_micros(&self) -> i64 {
        self.origin.elapsed().as_micros() as i64
    }

    fn spin_sleep(&self) {
        std::thread::sleep(Duration::from_nanos(SPIN_SLEEP_NANOS));
    }
}

/// Test clock advanced by hand; each `spin_sleep` steps it forward so the
/// scheduler's wait loop terminates deterministically.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    now: std::cell::Cell<i64>,
    step: i64,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start_micros: i64, step_micros: i64) -> Self {
        Self {
            now: std::cell::Cell::new(start_micros),
            step: step_micros,
        }
    }
}

#[cfg(test)]
impl MonotonicClock for ManualClock {
    fn now_micros(&self) -> i64 {
        self.now.get()
    }

    fn spin_sleep(&self) {
        self.now.set(self.now.get() + self.step);
    }
}
