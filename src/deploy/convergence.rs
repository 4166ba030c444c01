// ABOUTME: Convergence polling shared by deploys and rollbacks.
// ABOUTME: Sleeps through the injected clock; transient API errors are absorbed.

use std::time::Duration;

use crate::cloud::{Clock, CloudError, ContainerService, TaskStatus};
use crate::graph::CancelToken;
use crate::types::TaskDefinitionArn;

use super::error::DeployError;

/// Time between convergence checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Poll until the service has settled on `target`, the timeout elapses, or
/// the run is cancelled.
///
/// A transient API failure is not retried on its own; the next poll
/// iteration re-queries anyway.
pub(crate) async fn await_convergence<S, C>(
    svc: &S,
    clock: &C,
    cluster: &str,
    service: &str,
    target: &TaskDefinitionArn,
    timeout: Duration,
    cancel: &CancelToken,
) -> Result<(), DeployError>
where
    S: ContainerService + ?Sized,
    C: Clock + ?Sized,
{
    let start = clock.now();

    loop {
        if cancel.is_cancelled() {
            return Err(DeployError::Cancelled(service.to_string()));
        }

        match check(svc, cluster, service, target).await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => {
                tracing::debug!("convergence check failed, re-querying next poll: {}", e);
            }
        }

        if clock.now().duration_since(start) >= timeout {
            return Err(DeployError::Timeout {
                service: service.to_string(),
                timeout,
            });
        }

        clock.sleep(POLL_INTERVAL).await;
    }
}

/// One convergence check: exactly one in-flight deployment and as many
/// RUNNING tasks on the target revision as the service wants.
async fn check<S>(
    svc: &S,
    cluster: &str,
    service: &str,
    target: &TaskDefinitionArn,
) -> Result<bool, CloudError>
where
    S: ContainerService + ?Sized,
{
    let Some(description) = svc.describe_service(service, cluster).await? else {
        // The service vanishing mid-poll reads as not-converged; the
        // timeout decides the outcome.
        return Ok(false);
    };

    // A service that wants zero tasks has nothing to wait for.
    if description.desired_count == 0 {
        return Ok(true);
    }

    if description.deployments.len() != 1 {
        return Ok(false);
    }

    let task_arns = svc.list_tasks(cluster, service, TaskStatus::Running).await?;
    if task_arns.is_empty() {
        return Ok(false);
    }

    let tasks = svc.describe_tasks(cluster, &task_arns).await?;
    let matching = tasks
        .iter()
        .filter(|t| t.last_status == TaskStatus::Running && t.task_definition == *target)
        .count() as u32;

    Ok(matching == description.desired_count)
}
