// ABOUTME: Error types for graph construction and traversal.
// ABOUTME: Cycle and unknown-dependency errors are fatal before anything starts.

use crate::types::UnitName;

/// Error type surfaced by unit actions.
///
/// Actions report domain-specific errors; the traversal engine wraps them
/// with unit context. Callers downcast when they need the concrete type.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from graph construction and traversal.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The declared dependencies form a cycle. Reported with the joined
    /// path, e.g. `a -> b -> c -> a`. Nothing is started.
    #[error("dependency cycle detected: {0}")]
    CycleDetected(String),

    /// Strict mode only: a unit names a dependency that is not a known unit.
    #[error("unit {unit} depends on unknown unit {dependency}")]
    UnknownDependency { unit: UnitName, dependency: UnitName },

    /// A unit's action failed. First failure wins; siblings already
    /// completed are not undone.
    #[error("unit {unit} failed: {source}")]
    UnitFailed {
        unit: UnitName,
        #[source]
        source: ActionError,
    },

    /// A unit's task panicked instead of returning.
    #[error("unit {unit} panicked: {message}")]
    UnitPanicked { unit: UnitName, message: String },
}
