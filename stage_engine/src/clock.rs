//! Time sources for the frame loop.
//!
//! The engine never reads wall-clock time directly; it is handed a [`Clock`]
//! at construction so headless hosts and tests can drive simulated time.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source injected into the engine.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Elapsed wall-clock time since construction; the default for live hosts.
#[derive(Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock for headless runs and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get() + dt);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
