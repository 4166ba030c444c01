// ABOUTME: Generic rollout struct parameterized by state marker.
// ABOUTME: State-guaranteed data accumulates as transitions run.

use std::marker::PhantomData;

use crate::cloud::{HealthCheckThresholds, ServiceDescription, TaskDefinitionSnapshot};
use crate::types::{TargetGroupArn, UnitName};

use super::request::DeployRequest;
use super::state::{Completed, Converged, Described, Planned, Registered, Updating};

/// Original target-group thresholds saved by unsafe mode, restored once the
/// rollout settles.
#[derive(Debug, Clone)]
pub(crate) struct SavedThresholds {
    pub(crate) target_group: TargetGroupArn,
    pub(crate) thresholds: HealthCheckThresholds,
}

/// A rolling update in progress, parameterized by its current state.
///
/// Each transition consumes `self` and returns the next state, so a rollout
/// can't skip describing the service or converge before updating. The
/// `Option` fields are invariants of the states that set them.
#[derive(Debug)]
pub struct Rollout<S> {
    pub(crate) request: DeployRequest,
    pub(crate) service: Option<ServiceDescription>,
    pub(crate) rollback_record: Option<TaskDefinitionSnapshot>,
    pub(crate) new_revision: Option<TaskDefinitionSnapshot>,
    pub(crate) saved_thresholds: Option<SavedThresholds>,
    pub(crate) _state: PhantomData<S>,
}

impl Rollout<Planned> {
    pub fn new(request: DeployRequest) -> Self {
        Rollout {
            request,
            service: None,
            rollback_record: None,
            new_revision: None,
            saved_thresholds: None,
            _state: PhantomData,
        }
    }
}

impl<S> Rollout<S> {
    /// The unit this rollout targets.
    pub fn unit(&self) -> &UnitName {
        &self.request.unit
    }

    /// The request this rollout was created from.
    pub fn request(&self) -> &DeployRequest {
        &self.request
    }
}

impl Rollout<Described> {
    /// The described service.
    pub fn service(&self) -> &ServiceDescription {
        self.service.as_ref().expect("described rollout has service")
    }
}

impl Rollout<Registered> {
    /// The pre-deploy snapshot kept for rollback.
    pub fn rollback_record(&self) -> &TaskDefinitionSnapshot {
        self.rollback_record
            .as_ref()
            .expect("registered rollout has rollback record")
    }

    /// The revision this rollout is driving toward.
    pub fn target_revision(&self) -> &TaskDefinitionSnapshot {
        self.new_revision
            .as_ref()
            .expect("registered rollout has target revision")
    }
}

impl Rollout<Updating> {
    pub fn target_revision(&self) -> &TaskDefinitionSnapshot {
        self.new_revision
            .as_ref()
            .expect("updating rollout has target revision")
    }
}

impl Rollout<Converged> {
    pub fn target_revision(&self) -> &TaskDefinitionSnapshot {
        self.new_revision
            .as_ref()
            .expect("converged rollout has target revision")
    }
}

impl Rollout<Completed> {
    /// The revision now serving traffic.
    pub fn deployed_revision(&self) -> &TaskDefinitionSnapshot {
        self.new_revision
            .as_ref()
            .expect("completed rollout has deployed revision")
    }
}
