// ABOUTME: Shared test support: in-memory cloud fakes and a manual clock.
// ABOUTME: Used by the deploy, rollback, and redeploy integration tests.

#![allow(dead_code)]

pub mod fake_cloud;
pub mod manual_clock;

pub use fake_cloud::{ConvergeBehavior, FakeCloud};
pub use manual_clock::ManualClock;
