//! Clock implementations for the POSTURA timeline

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use postura_core::MonoTime;

/// Source of monotonic timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> MonoTime;
}

/// Monotonic clock backed by the OS
/// INVARIANT: `now()` never goes backwards
pub struct MonotonicClock {
    /// Instant that maps to `MonoTime::ZERO`
    reference: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            reference: Instant::now(),
        }
    }

    /// Elapsed time since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.reference.elapsed()
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> MonoTime {
        MonoTime::ZERO.saturating_add(self.elapsed())
    }
}

/// Hand-driven clock for tests and replays
///
/// Cloning yields a handle onto the same time value.
#[derive(Clone, Default)]
pub struct ManualClock {
    value: Arc<Mutex<MonoTime>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(t: MonoTime) -> Self {
        ManualClock {
            value: Arc::new(Mutex::new(t)),
        }
    }

    /// Move time forward by `dt`
    pub fn advance(&self, dt: Duration) -> MonoTime {
        let mut value = self.value.lock();
        *value = value.saturating_add(dt);
        *value
    }

    /// Jump to `t`; only moves forward
    pub fn set(&self, t: MonoTime) {
        let mut value = self.value.lock();
        if t > *value {
            *value = t;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> MonoTime {
        *self.value.lock()
    }
}
