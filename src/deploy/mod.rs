// ABOUTME: Rolling-update deployment using the type state pattern.
// ABOUTME: Exports state markers, the Rollout machine, and the Deployer front-end.

mod action;
mod convergence;
mod deployer;
mod error;
mod request;
mod rollout;
mod state;
mod transitions;

pub use action::{DeployAction, UnitPlan};
pub use convergence::POLL_INTERVAL;
pub use deployer::Deployer;
pub use error::DeployError;
pub use request::{DEFAULT_TIMEOUT, DeployRequest, ImageSpec};
pub use rollout::Rollout;
pub use state::{Completed, Converged, Described, Planned, Registered, Updating};
pub use transitions::{ROLLBACK_TIMEOUT, TransitionResult};
