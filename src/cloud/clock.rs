// ABOUTME: Injectable clock abstraction for poll loops.
// ABOUTME: TokioClock in production, a manual clock in tests.

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Time source and sleeper for convergence polling.
///
/// Injecting this keeps the 5-second poll loop deterministic under test:
/// a fake clock advances virtual time instead of sleeping.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
