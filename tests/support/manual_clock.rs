// ABOUTME: Deterministic clock for poll-loop tests.
// ABOUTME: Sleeping advances virtual time instead of waiting.

use async_trait::async_trait;
use convoy::cloud::Clock;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Clock whose `sleep` advances virtual time immediately.
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sleeps the code under test performed.
    pub fn slept_count(&self) -> usize {
        self.sleeps.lock().len()
    }

    /// Total virtual time slept.
    pub fn slept_total(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }

    async fn sleep(&self, duration: Duration) {
        *self.offset.lock() += duration;
        self.sleeps.lock().push(duration);
    }
}
