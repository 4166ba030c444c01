// ABOUTME: Container service trait for the orchestration control plane.
// ABOUTME: Describe services, manage task definition revisions, update services, list tasks.

use super::types::{
    ServiceDescription, TaskDefinitionSnapshot, TaskDefinitionSpec, TaskStatus, TaskSummary,
};
use crate::types::{TaskArn, TaskDefinitionArn};
use async_trait::async_trait;

/// Control-plane operations against the container-orchestration service.
///
/// Implemented outside this crate by the concrete cloud client; implemented
/// in-memory by test fakes.
#[async_trait]
pub trait ContainerService: Send + Sync {
    /// Describe a service by name within a cluster.
    async fn describe_service(
        &self,
        name: &str,
        cluster: &str,
    ) -> Result<Option<ServiceDescription>, ContainerServiceError>;

    /// Describe a task definition revision by ARN or `family:revision`.
    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinitionSnapshot, ContainerServiceError>;

    /// List revision ARNs in a family, most recent first.
    async fn list_task_definitions(
        &self,
        family: &str,
    ) -> Result<Vec<TaskDefinitionArn>, ContainerServiceError>;

    /// Register a new revision. The control plane assigns the revision number.
    async fn register_task_definition(
        &self,
        spec: &TaskDefinitionSpec,
    ) -> Result<TaskDefinitionSnapshot, ContainerServiceError>;

    /// Deregister a revision. The revision stays describable but is no
    /// longer eligible for new deployments.
    async fn deregister_task_definition(
        &self,
        arn: &TaskDefinitionArn,
    ) -> Result<(), ContainerServiceError>;

    /// Point a service at a revision, optionally forcing a redeployment of
    /// tasks already on that revision.
    async fn update_service(
        &self,
        name: &str,
        cluster: &str,
        task_definition: &TaskDefinitionArn,
        force_new_deployment: bool,
    ) -> Result<(), ContainerServiceError>;

    /// List task ARNs for a service filtered by lifecycle status.
    async fn list_tasks(
        &self,
        cluster: &str,
        service: &str,
        status: TaskStatus,
    ) -> Result<Vec<TaskArn>, ContainerServiceError>;

    /// Describe tasks by ARN.
    async fn describe_tasks(
        &self,
        cluster: &str,
        arns: &[TaskArn],
    ) -> Result<Vec<TaskSummary>, ContainerServiceError>;
}

/// Errors from container service operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerServiceError {
    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("task definition not found: {0}")]
    TaskDefinitionNotFound(String),

    #[error("request throttled: {0}")]
    Throttled(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("api error: {0}")]
    Api(String),
}
