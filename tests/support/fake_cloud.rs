// ABOUTME: In-memory fake of the cloud capability traits.
// ABOUTME: Scripted convergence behavior per task definition revision.

use async_trait::async_trait;
use nonempty::NonEmpty;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

use convoy::cloud::{
    ContainerDefinition, ContainerService, ContainerServiceError, DeploymentInfo,
    HealthCheckThresholds, LoadBalancer, LoadBalancerError, LogEvent, LogStore, LogStoreError,
    ServiceDescription, TargetGroupDescription, TaskDefinitionSnapshot, TaskDefinitionSpec,
    TaskStatus, TaskSummary,
};
use convoy::types::{ImageRef, ServiceArn, TargetGroupArn, TaskArn, TaskDefinitionArn};

/// How a revision behaves once a service is updated to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergeBehavior {
    /// Settled on the first describe after the update.
    Immediately,
    /// Settled after this many describes.
    AfterPolls(u32),
    /// Never settles; the poll loop times out.
    Never,
}

struct ServiceState {
    cluster: String,
    desired_count: u32,
    task_definition: TaskDefinitionArn,
    target_group: Option<TargetGroupArn>,
    polls_seen: u32,
    settled: bool,
}

#[derive(Default)]
struct State {
    services: BTreeMap<String, ServiceState>,
    families: BTreeMap<String, Vec<TaskDefinitionSnapshot>>,
    behaviors: BTreeMap<String, ConvergeBehavior>,
    deregistered: Vec<TaskDefinitionArn>,
    target_groups: BTreeMap<String, HealthCheckThresholds>,
    threshold_history: Vec<(String, HealthCheckThresholds)>,
    update_calls: Vec<(String, TaskDefinitionArn, bool)>,
    log_groups: BTreeMap<String, Vec<(String, Vec<LogEvent>)>>,
    fail_log_store: bool,
}

/// One fake implementing ContainerService, LoadBalancer, and LogStore.
#[derive(Default, Clone)]
pub struct FakeCloud {
    state: Arc<Mutex<State>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Predictable ARN for a family revision.
    pub fn arn_for(family: &str, revision: u64) -> TaskDefinitionArn {
        TaskDefinitionArn::new(format!("arn:taskdef/{family}:{revision}"))
    }

    /// Register a revision directly (test setup).
    pub fn seed_revision(
        &self,
        family: &str,
        containers: NonEmpty<ContainerDefinition>,
    ) -> TaskDefinitionSnapshot {
        let mut state = self.state.lock();
        let revisions = state.families.entry(family.to_string()).or_default();
        let revision = revisions.iter().map(|r| r.revision).max().unwrap_or(0) + 1;
        let snapshot = TaskDefinitionSnapshot {
            arn: Self::arn_for(family, revision),
            family: family.to_string(),
            revision,
            containers,
            cpu: Some("256".to_string()),
            memory: Some("512".to_string()),
            network_mode: Some("awsvpc".to_string()),
            execution_role: Some("arn:role/execution".to_string()),
            task_role: Some("arn:role/task".to_string()),
            volumes: Vec::new(),
            compatibilities: vec!["FARGATE".to_string()],
        };
        revisions.push(snapshot.clone());
        snapshot
    }

    /// Create a service pointing at a revision (test setup).
    pub fn seed_service(
        &self,
        name: &str,
        cluster: &str,
        desired_count: u32,
        task_definition: TaskDefinitionArn,
        target_group: Option<TargetGroupArn>,
    ) {
        let mut state = self.state.lock();
        state.services.insert(
            name.to_string(),
            ServiceState {
                cluster: cluster.to_string(),
                desired_count,
                task_definition,
                target_group,
                polls_seen: 0,
                settled: true,
            },
        );
    }

    pub fn seed_target_group(&self, arn: &TargetGroupArn, thresholds: HealthCheckThresholds) {
        self.state
            .lock()
            .target_groups
            .insert(arn.to_string(), thresholds);
    }

    pub fn seed_log_stream(&self, group: &str, stream: &str, events: Vec<LogEvent>) {
        self.state
            .lock()
            .log_groups
            .entry(group.to_string())
            .or_default()
            .insert(0, (stream.to_string(), events));
    }

    /// Script how a revision converges once deployed to.
    pub fn set_behavior(&self, arn: &TaskDefinitionArn, behavior: ConvergeBehavior) {
        self.state
            .lock()
            .behaviors
            .insert(arn.to_string(), behavior);
    }

    /// Make every log store call fail (diagnostics must stay best-effort).
    pub fn fail_log_store(&self) {
        self.state.lock().fail_log_store = true;
    }

    pub fn deregistered(&self) -> Vec<TaskDefinitionArn> {
        self.state.lock().deregistered.clone()
    }

    /// Every update-service call: (revision arn, force flag).
    pub fn update_calls(&self) -> Vec<(String, TaskDefinitionArn, bool)> {
        self.state.lock().update_calls.clone()
    }

    /// Thresholds applied to target groups, in order.
    pub fn threshold_history(&self) -> Vec<(String, HealthCheckThresholds)> {
        self.state.lock().threshold_history.clone()
    }

    /// Registered revisions in a family, ascending.
    pub fn revisions(&self, family: &str) -> Vec<u64> {
        self.state
            .lock()
            .families
            .get(family)
            .map(|revs| revs.iter().map(|r| r.revision).collect())
            .unwrap_or_default()
    }

    fn lookup_snapshot(
        state: &State,
        reference: &str,
    ) -> Result<TaskDefinitionSnapshot, ContainerServiceError> {
        let trimmed = reference.strip_prefix("arn:taskdef/").unwrap_or(reference);
        let (family, revision) = trimmed
            .rsplit_once(':')
            .ok_or_else(|| ContainerServiceError::TaskDefinitionNotFound(reference.to_string()))?;
        let revision: u64 = revision
            .parse()
            .map_err(|_| ContainerServiceError::TaskDefinitionNotFound(reference.to_string()))?;
        state
            .families
            .get(family)
            .and_then(|revs| revs.iter().find(|r| r.revision == revision))
            .cloned()
            .ok_or_else(|| ContainerServiceError::TaskDefinitionNotFound(reference.to_string()))
    }
}

#[async_trait]
impl ContainerService for FakeCloud {
    async fn describe_service(
        &self,
        name: &str,
        cluster: &str,
    ) -> Result<Option<ServiceDescription>, ContainerServiceError> {
        let mut state = self.state.lock();
        let behavior = {
            let Some(svc) = state.services.get(name) else {
                return Ok(None);
            };
            if svc.cluster != cluster {
                return Ok(None);
            }
            state
                .behaviors
                .get(svc.task_definition.as_str())
                .copied()
                .unwrap_or(ConvergeBehavior::Immediately)
        };
        let svc = state
            .services
            .get_mut(name)
            .expect("service existence checked above");

        if !svc.settled {
            svc.polls_seen += 1;
            svc.settled = match behavior {
                ConvergeBehavior::Immediately => true,
                ConvergeBehavior::AfterPolls(n) => svc.polls_seen > n,
                ConvergeBehavior::Never => false,
            };
        }

        let mut deployments = vec![DeploymentInfo {
            id: "deploy-1".to_string(),
            task_definition: svc.task_definition.clone(),
            primary: true,
            running_count: if svc.settled { svc.desired_count } else { 0 },
        }];
        if !svc.settled {
            deployments.push(DeploymentInfo {
                id: "deploy-0".to_string(),
                task_definition: svc.task_definition.clone(),
                primary: false,
                running_count: svc.desired_count,
            });
        }

        Ok(Some(ServiceDescription {
            arn: ServiceArn::new(format!("arn:service/{name}")),
            name: name.to_string(),
            cluster: cluster.to_string(),
            desired_count: svc.desired_count,
            running_count: if svc.settled { svc.desired_count } else { 0 },
            task_definition: svc.task_definition.clone(),
            deployments,
            target_group: svc.target_group.clone(),
        }))
    }

    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinitionSnapshot, ContainerServiceError> {
        let state = self.state.lock();
        Self::lookup_snapshot(&state, reference)
    }

    async fn list_task_definitions(
        &self,
        family: &str,
    ) -> Result<Vec<TaskDefinitionArn>, ContainerServiceError> {
        let state = self.state.lock();
        let mut revisions: Vec<&TaskDefinitionSnapshot> = state
            .families
            .get(family)
            .map(|revs| revs.iter().collect())
            .unwrap_or_default();
        revisions.sort_by(|a, b| b.revision.cmp(&a.revision));
        Ok(revisions.iter().map(|r| r.arn.clone()).collect())
    }

    async fn register_task_definition(
        &self,
        spec: &TaskDefinitionSpec,
    ) -> Result<TaskDefinitionSnapshot, ContainerServiceError> {
        let mut state = self.state.lock();
        let revisions = state.families.entry(spec.family.clone()).or_default();
        let revision = revisions.iter().map(|r| r.revision).max().unwrap_or(0) + 1;
        let snapshot = TaskDefinitionSnapshot {
            arn: Self::arn_for(&spec.family, revision),
            family: spec.family.clone(),
            revision,
            containers: spec.containers.clone(),
            cpu: spec.cpu.clone(),
            memory: spec.memory.clone(),
            network_mode: spec.network_mode.clone(),
            execution_role: spec.execution_role.clone(),
            task_role: spec.task_role.clone(),
            volumes: spec.volumes.clone(),
            compatibilities: spec.compatibilities.clone(),
        };
        revisions.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn deregister_task_definition(
        &self,
        arn: &TaskDefinitionArn,
    ) -> Result<(), ContainerServiceError> {
        self.state.lock().deregistered.push(arn.clone());
        Ok(())
    }

    async fn update_service(
        &self,
        name: &str,
        _cluster: &str,
        task_definition: &TaskDefinitionArn,
        force_new_deployment: bool,
    ) -> Result<(), ContainerServiceError> {
        let mut state = self.state.lock();
        state.update_calls.push((
            name.to_string(),
            task_definition.clone(),
            force_new_deployment,
        ));
        let svc = state
            .services
            .get_mut(name)
            .ok_or_else(|| ContainerServiceError::ServiceNotFound(name.to_string()))?;
        svc.task_definition = task_definition.clone();
        svc.polls_seen = 0;
        svc.settled = false;
        Ok(())
    }

    async fn list_tasks(
        &self,
        _cluster: &str,
        service: &str,
        status: TaskStatus,
    ) -> Result<Vec<TaskArn>, ContainerServiceError> {
        let state = self.state.lock();
        let Some(svc) = state.services.get(service) else {
            return Ok(Vec::new());
        };
        if status != TaskStatus::Running || !svc.settled {
            return Ok(Vec::new());
        }
        Ok((0..svc.desired_count)
            .map(|i| TaskArn::new(format!("arn:task/{service}/{i}")))
            .collect())
    }

    async fn describe_tasks(
        &self,
        _cluster: &str,
        arns: &[TaskArn],
    ) -> Result<Vec<TaskSummary>, ContainerServiceError> {
        let state = self.state.lock();
        let mut out = Vec::with_capacity(arns.len());
        for arn in arns {
            // Task ARNs are "arn:task/{service}/{i}".
            let service = arn
                .as_str()
                .strip_prefix("arn:task/")
                .and_then(|rest| rest.split('/').next())
                .unwrap_or_default();
            if let Some(svc) = state.services.get(service) {
                out.push(TaskSummary {
                    arn: arn.clone(),
                    task_definition: svc.task_definition.clone(),
                    last_status: TaskStatus::Running,
                });
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl LoadBalancer for FakeCloud {
    async fn describe_target_group(
        &self,
        arn: &TargetGroupArn,
    ) -> Result<TargetGroupDescription, LoadBalancerError> {
        let state = self.state.lock();
        let thresholds = state
            .target_groups
            .get(arn.as_str())
            .copied()
            .ok_or_else(|| LoadBalancerError::TargetGroupNotFound(arn.to_string()))?;
        Ok(TargetGroupDescription {
            arn: arn.clone(),
            thresholds,
        })
    }

    async fn modify_target_group(
        &self,
        arn: &TargetGroupArn,
        thresholds: &HealthCheckThresholds,
    ) -> Result<(), LoadBalancerError> {
        let mut state = self.state.lock();
        if !state.target_groups.contains_key(arn.as_str()) {
            return Err(LoadBalancerError::TargetGroupNotFound(arn.to_string()));
        }
        state.target_groups.insert(arn.to_string(), *thresholds);
        state
            .threshold_history
            .push((arn.to_string(), *thresholds));
        Ok(())
    }
}

#[async_trait]
impl LogStore for FakeCloud {
    async fn describe_log_streams(
        &self,
        group: &str,
        limit: usize,
    ) -> Result<Vec<String>, LogStoreError> {
        let state = self.state.lock();
        if state.fail_log_store {
            return Err(LogStoreError::Api("log store unavailable".to_string()));
        }
        let streams = state
            .log_groups
            .get(group)
            .ok_or_else(|| LogStoreError::GroupNotFound(group.to_string()))?;
        Ok(streams
            .iter()
            .take(limit)
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn get_log_events(
        &self,
        group: &str,
        stream: &str,
    ) -> Result<Vec<LogEvent>, LogStoreError> {
        let state = self.state.lock();
        if state.fail_log_store {
            return Err(LogStoreError::Api("log store unavailable".to_string()));
        }
        state
            .log_groups
            .get(group)
            .and_then(|streams| streams.iter().find(|(name, _)| name == stream))
            .map(|(_, events)| events.clone())
            .ok_or_else(|| LogStoreError::StreamNotFound(stream.to_string()))
    }
}

/// Standard two-container task definition: the unit container plus a
/// sidecar that deploys must never touch.
pub fn containers_with_sidecar(unit: &str, image: &str) -> NonEmpty<ContainerDefinition> {
    let mut containers = NonEmpty::new(ContainerDefinition {
        name: unit.to_string(),
        image: ImageRef::parse(image).expect("valid image"),
        essential: true,
        cpu: Some(128),
        memory: Some(256),
        environment: BTreeMap::new(),
        log_group: Some(format!("/svc/{unit}")),
    });
    containers.push(ContainerDefinition {
        name: "envoy".to_string(),
        image: ImageRef::parse("proxy/envoy:v1.29").expect("valid image"),
        essential: false,
        cpu: Some(64),
        memory: Some(128),
        environment: BTreeMap::new(),
        log_group: None,
    });
    containers
}
