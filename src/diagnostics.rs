// ABOUTME: Diagnostics accumulator for non-fatal warnings during orchestration.
// ABOUTME: Collects warnings that shouldn't fail a run but should be shown to users.

use parking_lot::Mutex;
use std::sync::Arc;

/// Collects non-fatal warnings during graph builds and deployments.
///
/// Clones share one underlying list so concurrent unit actions can all
/// report into the same accumulator. The lock is never held across an await.
#[derive(Default, Clone)]
pub struct Diagnostics {
    warnings: Arc<Mutex<Vec<Warning>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.lock().push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.lock().clone()
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.lock().is_empty()
    }
}

/// A non-fatal warning collected during orchestration.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create an unknown-dependency warning (lenient graph builds).
    pub fn unknown_dependency(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnknownDependency,
            message: message.into(),
        }
    }

    /// Create a threshold-restore warning (unsafe mode cleanup).
    pub fn threshold_restore(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ThresholdRestore,
            message: message.into(),
        }
    }

    /// Create a log-fetch warning (rollback diagnostics).
    pub fn log_fetch(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LogFetch,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A unit declared a dependency on a unit that does not exist.
    UnknownDependency,
    /// Failed to restore original health-check thresholds after unsafe mode.
    ThresholdRestore,
    /// Failed to fetch diagnostic logs during rollback.
    LogFetch,
}
