// ABOUTME: Error types for rolling-update deployments.
// ABOUTME: Rolled-back and rollback-failed outcomes are distinct variants.

use std::time::Duration;

use crate::cloud::CloudError;

/// Errors that can occur during a rolling update.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The named service does not exist in the cluster. Nothing started.
    #[error("service {service} not found in cluster {cluster}")]
    ServiceNotFound { service: String, cluster: String },

    /// The task definition has no container named after the unit.
    #[error("no container named {container} in task definition family {family}")]
    ContainerNotFound { container: String, family: String },

    /// Deploy was requested without an image.
    #[error("deploy request for {0} carries no image")]
    MissingImage(String),

    /// A traversal reached a unit no plan was supplied for.
    #[error("no deploy plan for unit {0}")]
    NoPlan(String),

    /// No registered revisions exist in the family.
    #[error("no registered revisions in family {0}")]
    NoRevisions(String),

    /// A cloud API call failed outside the convergence poll.
    #[error(transparent)]
    Cloud(#[from] CloudError),

    /// The new revision did not converge in time. Triggers rollback.
    #[error("deployment of {service} did not converge within {timeout:?}")]
    Timeout { service: String, timeout: Duration },

    /// The deploy failed and the previous revision was restored. The
    /// service is healthy on the old revision.
    #[error("deployment of {service} failed; rolled back to revision {revision}")]
    RolledBack { service: String, revision: u64 },

    /// Both the deploy and the rollback failed to converge. The live state
    /// may be straddled between revisions; manual intervention required.
    #[error("deployment and rollback of {service} both failed; manual intervention required")]
    RollbackFailed { service: String },

    /// The run was cancelled at a poll point. No rollback is attempted.
    #[error("deployment of {0} cancelled")]
    Cancelled(String),
}
