// ABOUTME: Shared types used across cloud capability trait definitions.
// ABOUTME: ServiceDescription, TaskDefinitionSnapshot, ContainerDefinition, etc.

use crate::types::{ImageRef, ServiceArn, TargetGroupArn, TaskArn, TaskDefinitionArn};
use nonempty::NonEmpty;
use std::collections::BTreeMap;
use std::time::Duration;

/// A described container-orchestration service.
#[derive(Debug, Clone)]
pub struct ServiceDescription {
    /// Service ARN.
    pub arn: ServiceArn,
    /// Service name (matches the unit name).
    pub name: String,
    /// Cluster the service runs in.
    pub cluster: String,
    /// Number of tasks the service wants running.
    pub desired_count: u32,
    /// Number of tasks currently running.
    pub running_count: u32,
    /// Task definition revision the service points at.
    pub task_definition: TaskDefinitionArn,
    /// In-flight deployments. Exactly one means the service is settled.
    pub deployments: Vec<DeploymentInfo>,
    /// Target group tracking task health, if the service is load balanced.
    pub target_group: Option<TargetGroupArn>,
}

/// One rollout the control plane is tracking for a service.
#[derive(Debug, Clone)]
pub struct DeploymentInfo {
    /// Deployment ID assigned by the control plane.
    pub id: String,
    /// Task definition this deployment is driving toward.
    pub task_definition: TaskDefinitionArn,
    /// Whether this is the primary (most recent) deployment.
    pub primary: bool,
    /// Running tasks attributed to this deployment.
    pub running_count: u32,
}

/// Immutable record of a registered task definition revision.
///
/// Snapshots are superseded by new registrations, never mutated. The
/// pre-deploy snapshot doubles as the rollback record.
#[derive(Debug, Clone)]
pub struct TaskDefinitionSnapshot {
    /// Revision ARN.
    pub arn: TaskDefinitionArn,
    /// Family name (one family per service).
    pub family: String,
    /// Monotonically increasing revision number within the family.
    pub revision: u64,
    /// Containers in the task. Always at least one.
    pub containers: NonEmpty<ContainerDefinition>,
    /// Task-level CPU units, if sized at the task level.
    pub cpu: Option<String>,
    /// Task-level memory, if sized at the task level.
    pub memory: Option<String>,
    /// Network mode (e.g. "awsvpc", "bridge").
    pub network_mode: Option<String>,
    /// Execution role ARN.
    pub execution_role: Option<String>,
    /// Task role ARN.
    pub task_role: Option<String>,
    /// Volumes shared between containers.
    pub volumes: Vec<VolumeSpec>,
    /// Launch-type compatibilities (e.g. "FARGATE").
    pub compatibilities: Vec<String>,
}

impl TaskDefinitionSnapshot {
    /// Build a registration spec preserving every field of this revision.
    /// Callers mutate the returned spec (usually just one container image)
    /// before registering.
    pub fn to_spec(&self) -> TaskDefinitionSpec {
        TaskDefinitionSpec {
            family: self.family.clone(),
            containers: self.containers.clone(),
            cpu: self.cpu.clone(),
            memory: self.memory.clone(),
            network_mode: self.network_mode.clone(),
            execution_role: self.execution_role.clone(),
            task_role: self.task_role.clone(),
            volumes: self.volumes.clone(),
            compatibilities: self.compatibilities.clone(),
        }
    }

    /// Log group of the container named `name`, if it logs anywhere.
    pub fn log_group_for(&self, name: &str) -> Option<&str> {
        self.containers
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.log_group.as_deref())
    }
}

/// Input for registering a new task definition revision.
#[derive(Debug, Clone)]
pub struct TaskDefinitionSpec {
    pub family: String,
    pub containers: NonEmpty<ContainerDefinition>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub network_mode: Option<String>,
    pub execution_role: Option<String>,
    pub task_role: Option<String>,
    pub volumes: Vec<VolumeSpec>,
    pub compatibilities: Vec<String>,
}

/// One container within a task definition.
#[derive(Debug, Clone)]
pub struct ContainerDefinition {
    /// Container name. The unit's primary container is named after the unit.
    pub name: String,
    /// Image the container runs.
    pub image: ImageRef,
    /// Whether task health depends on this container.
    pub essential: bool,
    /// Container-level CPU units.
    pub cpu: Option<u32>,
    /// Container-level memory (MiB).
    pub memory: Option<u32>,
    /// Environment variables.
    pub environment: BTreeMap<String, String>,
    /// Log group this container ships logs to.
    pub log_group: Option<String>,
}

/// A volume declared at the task level.
#[derive(Debug, Clone)]
pub struct VolumeSpec {
    pub name: String,
    pub host_path: Option<String>,
}

/// Task lifecycle status filter for listing tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Stopped,
}

/// Summary of one task returned by describe-tasks.
#[derive(Debug, Clone)]
pub struct TaskSummary {
    pub arn: TaskArn,
    /// Revision the task was launched from.
    pub task_definition: TaskDefinitionArn,
    pub last_status: TaskStatus,
}

/// A described target group.
#[derive(Debug, Clone)]
pub struct TargetGroupDescription {
    pub arn: TargetGroupArn,
    pub thresholds: HealthCheckThresholds,
}

/// Health-check tuning of a target group.
///
/// Unsafe mode lowers these to get convergence feedback faster, then
/// restores the originals once the rollout settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthCheckThresholds {
    pub interval: Duration,
    pub timeout: Duration,
    pub healthy_count: u32,
    pub unhealthy_count: u32,
}

impl HealthCheckThresholds {
    /// The fastest settings most load balancers accept. Trades health-check
    /// confidence for convergence speed.
    pub fn fastest() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(2),
            healthy_count: 2,
            unhealthy_count: 2,
        }
    }
}

/// A single log event from a log stream.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub message: String,
}
