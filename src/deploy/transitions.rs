// ABOUTME: State transition methods for the rolling-update machine.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::marker::PhantomData;
use std::time::Duration;

use crate::cloud::{
    Clock, CloudError, ContainerService, HealthCheckThresholds, LoadBalancer, LogStore,
};
use crate::diagnostics::{Diagnostics, Warning};
use crate::graph::CancelToken;
use crate::types::RevisionSelector;

use super::Rollout;
use super::convergence;
use super::error::DeployError;
use super::request::ImageSpec;
use super::rollout::SavedThresholds;
use super::state::{Completed, Converged, Described, Planned, Registered, Updating};

/// Extended window a rollback gets to converge after a failed deploy.
pub const ROLLBACK_TIMEOUT: Duration = Duration::from_secs(600);

/// How many trailing log events to surface when a deploy fails.
const LOG_TAIL: usize = 20;

/// Result type for transitions that may need rollback on failure.
pub type TransitionResult<T, S> = Result<Rollout<T>, (Rollout<S>, DeployError)>;

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Rollout<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self) -> Rollout<T> {
        Rollout {
            request: self.request,
            service: self.service,
            rollback_record: self.rollback_record,
            new_revision: self.new_revision,
            saved_thresholds: self.saved_thresholds,
            _state: PhantomData,
        }
    }

    /// Best-effort restore of the target group's original thresholds after
    /// unsafe mode. A failure is a warning, not a deploy failure.
    async fn restore_thresholds<L: LoadBalancer + ?Sized>(
        &mut self,
        load_balancer: &L,
        diag: &Diagnostics,
    ) {
        let Some(saved) = self.saved_thresholds.take() else {
            return;
        };

        if let Err(e) = load_balancer
            .modify_target_group(&saved.target_group, &saved.thresholds)
            .await
        {
            diag.warn(Warning::threshold_restore(format!(
                "failed to restore health-check thresholds on {}: {}",
                saved.target_group, e
            )));
        }
    }
}

// =============================================================================
// Planned -> Described
// =============================================================================

impl Rollout<Planned> {
    /// Describe the service the request targets.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ServiceNotFound` if the service does not exist.
    #[must_use = "rollout state must be used"]
    pub async fn describe_service<S: ContainerService + ?Sized>(
        mut self,
        svc: &S,
    ) -> Result<Rollout<Described>, DeployError> {
        let service = svc
            .describe_service(self.request.unit.as_str(), &self.request.cluster)
            .await
            .map_err(CloudError::from)?
            .ok_or_else(|| DeployError::ServiceNotFound {
                service: self.request.unit.to_string(),
                cluster: self.request.cluster.clone(),
            })?;

        tracing::debug!(
            "service {} on revision {} with desired count {}",
            service.name,
            service.task_definition,
            service.desired_count
        );

        self.service = Some(service);
        Ok(self.transition())
    }
}

// =============================================================================
// Described -> Registered
// =============================================================================

impl Rollout<Described> {
    /// Deploy path: snapshot the current task definition as the rollback
    /// record, rewrite the unit container's image, and register the result
    /// as a new revision. Sidecar containers are left untouched, as is
    /// every task-level field (network mode, sizing, roles, volumes,
    /// compatibilities).
    ///
    /// # Errors
    ///
    /// Returns `ContainerNotFound` if the task definition has no container
    /// named after the unit, `MissingImage` if the request carries no image.
    #[must_use = "rollout state must be used"]
    pub async fn register_revision<S: ContainerService + ?Sized>(
        mut self,
        svc: &S,
    ) -> Result<Rollout<Registered>, DeployError> {
        let service = self.service.as_ref().expect("described rollout has service");

        let current = svc
            .describe_task_definition(service.task_definition.as_str())
            .await
            .map_err(CloudError::from)?;

        let mut spec = current.to_spec();
        let unit = self.request.unit.as_str();
        let container = spec
            .containers
            .iter_mut()
            .find(|c| c.name == unit)
            .ok_or_else(|| DeployError::ContainerNotFound {
                container: unit.to_string(),
                family: current.family.clone(),
            })?;

        container.image = match &self.request.image {
            Some(ImageSpec::Tag(tag)) => container.image.with_tag(tag),
            Some(ImageSpec::Explicit(image)) => image.clone(),
            None => return Err(DeployError::MissingImage(unit.to_string())),
        };

        let registered = svc
            .register_task_definition(&spec)
            .await
            .map_err(CloudError::from)?;

        tracing::info!(
            "registered revision {}:{} for {}",
            registered.family,
            registered.revision,
            unit
        );

        self.rollback_record = Some(current);
        self.new_revision = Some(registered);
        Ok(self.transition())
    }

    /// Redeploy path: resolve an already-registered revision by selector and
    /// make it the target. Registers nothing new.
    ///
    /// # Errors
    ///
    /// Returns `NoRevisions` if the family has no registered revisions for
    /// the `Latest` selector, or the cloud error for a missing explicit
    /// revision.
    #[must_use = "rollout state must be used"]
    pub async fn resolve_revision<S: ContainerService + ?Sized>(
        mut self,
        svc: &S,
        selector: RevisionSelector,
    ) -> Result<Rollout<Registered>, DeployError> {
        let service = self.service.as_ref().expect("described rollout has service");

        let current = svc
            .describe_task_definition(service.task_definition.as_str())
            .await
            .map_err(CloudError::from)?;

        let target = match selector {
            RevisionSelector::Current => current.clone(),
            RevisionSelector::Latest => {
                let revisions = svc
                    .list_task_definitions(&current.family)
                    .await
                    .map_err(CloudError::from)?;
                let latest = revisions
                    .first()
                    .ok_or_else(|| DeployError::NoRevisions(current.family.clone()))?;
                svc.describe_task_definition(latest.as_str())
                    .await
                    .map_err(CloudError::from)?
            }
            RevisionSelector::Revision(number) => svc
                .describe_task_definition(&format!("{}:{}", current.family, number))
                .await
                .map_err(CloudError::from)?,
        };

        tracing::info!(
            "redeploying {} to revision {}:{} (selector {})",
            self.request.unit,
            target.family,
            target.revision,
            selector
        );

        self.rollback_record = Some(current);
        self.new_revision = Some(target);
        Ok(self.transition())
    }
}

// =============================================================================
// Registered -> Updating
// =============================================================================

impl Rollout<Registered> {
    /// Point the service at the target revision with forced redeployment.
    ///
    /// In unsafe mode the target group's health-check thresholds are saved
    /// and lowered first so convergence feedback arrives faster.
    ///
    /// # Errors
    ///
    /// Returns the cloud error if the threshold swap or service update fails.
    #[must_use = "rollout state must be used"]
    pub async fn update_service<S, L>(
        mut self,
        svc: &S,
        load_balancer: &L,
    ) -> Result<Rollout<Updating>, DeployError>
    where
        S: ContainerService + ?Sized,
        L: LoadBalancer + ?Sized,
    {
        if self.request.unsafe_mode {
            let service = self.service.as_ref().expect("registered rollout has service");
            match &service.target_group {
                Some(target_group) => {
                    let described = load_balancer
                        .describe_target_group(target_group)
                        .await
                        .map_err(CloudError::from)?;
                    load_balancer
                        .modify_target_group(target_group, &HealthCheckThresholds::fastest())
                        .await
                        .map_err(CloudError::from)?;
                    tracing::warn!(
                        "unsafe mode: lowered health-check thresholds on {}",
                        target_group
                    );
                    self.saved_thresholds = Some(SavedThresholds {
                        target_group: target_group.clone(),
                        thresholds: described.thresholds,
                    });
                }
                None => {
                    tracing::debug!(
                        "unsafe mode requested but {} has no target group",
                        self.request.unit
                    );
                }
            }
        }

        let target = self
            .new_revision
            .as_ref()
            .expect("registered rollout has target revision");
        svc.update_service(
            self.request.unit.as_str(),
            &self.request.cluster,
            &target.arn,
            true,
        )
        .await
        .map_err(CloudError::from)?;

        Ok(self.transition())
    }
}

// =============================================================================
// Updating -> Converged (or rollback)
// =============================================================================

impl Rollout<Updating> {
    /// Wait for the service to settle on the target revision.
    ///
    /// # Errors
    ///
    /// Returns `(self, error)` on timeout or cancellation so the caller can
    /// roll back (or not, for cancellation).
    #[must_use = "rollout state must be used"]
    pub async fn await_convergence<S, C>(
        self,
        svc: &S,
        clock: &C,
        cancel: &CancelToken,
    ) -> TransitionResult<Converged, Updating>
    where
        S: ContainerService + ?Sized,
        C: Clock + ?Sized,
    {
        let target = self
            .new_revision
            .as_ref()
            .expect("updating rollout has target revision")
            .arn
            .clone();

        match convergence::await_convergence(
            svc,
            clock,
            &self.request.cluster,
            self.request.unit.as_str(),
            &target,
            self.request.timeout,
            cancel,
        )
        .await
        {
            Ok(()) => Ok(self.transition()),
            Err(e) => Err((self, e)),
        }
    }

    /// Roll the service back to the pre-deploy revision after a failed
    /// convergence.
    ///
    /// Fetches a diagnostic log tail first (best effort), then re-updates
    /// the service to the rollback record and waits with an extended
    /// timeout. Always returns an error: `RolledBack` when the old revision
    /// converged, `RollbackFailed` when it did not.
    pub async fn roll_back<S, L, G, C>(
        mut self,
        svc: &S,
        load_balancer: &L,
        logs: &G,
        clock: &C,
        diag: &Diagnostics,
        cancel: &CancelToken,
        cause: DeployError,
    ) -> DeployError
    where
        S: ContainerService + ?Sized,
        L: LoadBalancer + ?Sized,
        G: LogStore + ?Sized,
        C: Clock + ?Sized,
    {
        let unit = self.request.unit.clone();
        tracing::warn!("deployment of {} failed ({}), rolling back", unit, cause);

        self.fetch_diagnostic_logs(logs, diag).await;

        let old = self
            .rollback_record
            .as_ref()
            .expect("updating rollout has rollback record")
            .clone();
        let failed = self
            .new_revision
            .as_ref()
            .expect("updating rollout has target revision")
            .clone();

        if let Err(e) = svc
            .update_service(unit.as_str(), &self.request.cluster, &old.arn, true)
            .await
        {
            tracing::error!("rollback update of {} failed: {}", unit, e);
            return DeployError::RollbackFailed {
                service: unit.to_string(),
            };
        }

        let converged = convergence::await_convergence(
            svc,
            clock,
            &self.request.cluster,
            unit.as_str(),
            &old.arn,
            ROLLBACK_TIMEOUT,
            cancel,
        )
        .await;

        self.restore_thresholds(load_balancer, diag).await;

        match converged {
            Ok(()) => {
                // The failed revision is dead weight now. Redeploys can
                // target the same revision they rolled back from; never
                // deregister the revision the service just settled on.
                if failed.arn != old.arn
                    && let Err(e) = svc.deregister_task_definition(&failed.arn).await
                {
                    tracing::warn!("failed to deregister revision {}: {}", failed.arn, e);
                }
                DeployError::RolledBack {
                    service: unit.to_string(),
                    revision: old.revision,
                }
            }
            Err(e) => {
                tracing::error!("rollback of {} did not converge: {}", unit, e);
                DeployError::RollbackFailed {
                    service: unit.to_string(),
                }
            }
        }
    }

    /// Best-effort fetch of the most recent log stream's tail for
    /// diagnostics. Failures are recorded as warnings and swallowed.
    async fn fetch_diagnostic_logs<G: LogStore + ?Sized>(&self, logs: &G, diag: &Diagnostics) {
        let unit = self.request.unit.as_str();
        let Some(group) = self
            .new_revision
            .as_ref()
            .and_then(|r| r.log_group_for(unit))
            .map(str::to_string)
        else {
            return;
        };

        let stream = match logs.describe_log_streams(&group, 1).await {
            Ok(streams) => match streams.into_iter().next() {
                Some(stream) => stream,
                None => return,
            },
            Err(e) => {
                diag.warn(Warning::log_fetch(format!(
                    "could not list log streams in {}: {}",
                    group, e
                )));
                return;
            }
        };

        match logs.get_log_events(&group, &stream).await {
            Ok(events) => {
                let skip = events.len().saturating_sub(LOG_TAIL);
                for event in events.into_iter().skip(skip) {
                    tracing::warn!("[{}] {} {}", unit, event.timestamp, event.message);
                }
            }
            Err(e) => {
                diag.warn(Warning::log_fetch(format!(
                    "could not read log stream {}/{}: {}",
                    group, stream, e
                )));
            }
        }
    }
}

// =============================================================================
// Converged -> Completed
// =============================================================================

impl Rollout<Converged> {
    /// Finish the rollout: restore original thresholds if unsafe mode
    /// lowered them, then deregister the superseded revision.
    ///
    /// # Errors
    ///
    /// Returns the cloud error if deregistration fails. Threshold restore
    /// failure is a warning only.
    #[must_use = "rollout state must be used"]
    pub async fn finalize<S, L>(
        mut self,
        svc: &S,
        load_balancer: &L,
        diag: &Diagnostics,
    ) -> Result<Rollout<Completed>, DeployError>
    where
        S: ContainerService + ?Sized,
        L: LoadBalancer + ?Sized,
    {
        self.restore_thresholds(load_balancer, diag).await;

        let old = self
            .rollback_record
            .as_ref()
            .expect("converged rollout has rollback record");
        let new = self
            .new_revision
            .as_ref()
            .expect("converged rollout has target revision");

        // A redeploy of the current revision supersedes nothing.
        if old.arn != new.arn {
            svc.deregister_task_definition(&old.arn)
                .await
                .map_err(CloudError::from)?;
            tracing::info!("deregistered superseded revision {}", old.arn);
        }

        tracing::info!(
            "{} converged on revision {}:{}",
            self.request.unit,
            new.family,
            new.revision
        );

        Ok(self.transition())
    }
}
