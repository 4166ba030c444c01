// ABOUTME: Deployer front-end driving the rollout state machine end to end.
// ABOUTME: Owns the cloud clients and exposes deploy/redeploy.

use std::sync::Arc;

use crate::cloud::{Clock, ContainerService, LoadBalancer, LogStore};
use crate::diagnostics::Diagnostics;
use crate::graph::CancelToken;
use crate::types::RevisionSelector;

use super::Rollout;
use super::error::DeployError;
use super::request::DeployRequest;
use super::state::{Registered, Updating};

/// Runs rolling updates against the injected cloud clients.
///
/// Cheap to clone; each unit's rollout touches a distinct named service, so
/// one deployer can serve concurrent graph traversals without cross-unit
/// locking.
pub struct Deployer<S, L, G, C> {
    service: Arc<S>,
    load_balancer: Arc<L>,
    logs: Arc<G>,
    clock: Arc<C>,
}

impl<S, L, G, C> Clone for Deployer<S, L, G, C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            load_balancer: Arc::clone(&self.load_balancer),
            logs: Arc::clone(&self.logs),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, L, G, C> Deployer<S, L, G, C>
where
    S: ContainerService,
    L: LoadBalancer,
    G: LogStore,
    C: Clock,
{
    pub fn new(service: Arc<S>, load_balancer: Arc<L>, logs: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            service,
            load_balancer,
            logs,
            clock,
        }
    }

    /// Roll the unit to a new revision built from the request's image.
    ///
    /// # Errors
    ///
    /// `RolledBack` when the deploy failed but the old revision was
    /// restored; `RollbackFailed` when both failed; configuration and cloud
    /// errors before anything was mutated.
    pub async fn deploy(
        &self,
        request: DeployRequest,
        cancel: &CancelToken,
        diag: &Diagnostics,
    ) -> Result<(), DeployError> {
        let registered = Rollout::new(request)
            .describe_service(&*self.service)
            .await?
            .register_revision(&*self.service)
            .await?;

        self.drive(registered, cancel, diag).await
    }

    /// Re-push an already-registered revision picked by selector. Skips
    /// image rewrite and registration entirely.
    pub async fn redeploy(
        &self,
        request: DeployRequest,
        selector: RevisionSelector,
        cancel: &CancelToken,
        diag: &Diagnostics,
    ) -> Result<(), DeployError> {
        let registered = Rollout::new(request)
            .describe_service(&*self.service)
            .await?
            .resolve_revision(&*self.service, selector)
            .await?;

        self.drive(registered, cancel, diag).await
    }

    /// Shared tail of deploy and redeploy: update, converge, finalize, and
    /// roll back on convergence failure.
    async fn drive(
        &self,
        registered: Rollout<Registered>,
        cancel: &CancelToken,
        diag: &Diagnostics,
    ) -> Result<(), DeployError> {
        let updating: Rollout<Updating> = registered
            .update_service(&*self.service, &*self.load_balancer)
            .await?;

        match updating
            .await_convergence(&*self.service, &*self.clock, cancel)
            .await
        {
            Ok(converged) => {
                converged
                    .finalize(&*self.service, &*self.load_balancer, diag)
                    .await?;
                Ok(())
            }
            // Cancellation is not a failure; leave the service as-is
            // rather than rolling it back.
            Err((_, cause @ DeployError::Cancelled(_))) => Err(cause),
            Err((updating, cause)) => Err(updating
                .roll_back(
                    &*self.service,
                    &*self.load_balancer,
                    &*self.logs,
                    &*self.clock,
                    diag,
                    cancel,
                    cause,
                )
                .await),
        }
    }
}
