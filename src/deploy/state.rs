// ABOUTME: Rollout state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce valid state transitions at compile time.

/// Initial state: request accepted, nothing described yet.
/// Available actions: `describe_service()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Planned;

/// Service described: desired count and current revision known.
/// Available actions: `register_revision()`, `resolve_revision()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Described;

/// Target revision in hand: rollback record retained.
/// Available actions: `update_service()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Registered;

/// Service updated, redeployment forced.
/// Available actions: `await_convergence()`, `roll_back()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Updating;

/// New revision converged: running tasks match the desired count.
/// Available actions: `finalize()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Converged;

/// Completed: old revision deregistered, thresholds restored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Completed;
