// ABOUTME: Unified cloud error with SNAFU pattern.
// ABOUTME: Wraps per-trait errors for programmatic handling via kind().

use snafu::Snafu;

use super::container_service::ContainerServiceError;
use super::load_balancer::LoadBalancerError;
use super::log_store::LogStoreError;

/// Unified error over the three cloud capability traits.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CloudError {
    #[snafu(display("container service call failed: {source}"))]
    ContainerService { source: ContainerServiceError },

    #[snafu(display("load balancer call failed: {source}"))]
    LoadBalancer { source: LoadBalancerError },

    #[snafu(display("log store call failed: {source}"))]
    LogStore { source: LogStoreError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudErrorKind {
    /// The named service does not exist.
    ServiceMissing,
    /// The referenced task definition revision does not exist.
    TaskDefinitionMissing,
    /// The target group does not exist.
    TargetGroupMissing,
    /// The control plane throttled the request. Absorbed by the next poll.
    Throttled,
    /// Log group or stream unavailable.
    LogsUnavailable,
    /// Any other API failure.
    Api,
}

impl CloudError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> CloudErrorKind {
        match self {
            CloudError::ContainerService { source } => match source {
                ContainerServiceError::ServiceNotFound(_) => CloudErrorKind::ServiceMissing,
                ContainerServiceError::TaskDefinitionNotFound(_) => {
                    CloudErrorKind::TaskDefinitionMissing
                }
                ContainerServiceError::Throttled(_) => CloudErrorKind::Throttled,
                ContainerServiceError::InvalidRequest(_) | ContainerServiceError::Api(_) => {
                    CloudErrorKind::Api
                }
            },
            CloudError::LoadBalancer { source } => match source {
                LoadBalancerError::TargetGroupNotFound(_) => CloudErrorKind::TargetGroupMissing,
                LoadBalancerError::InvalidThresholds(_) | LoadBalancerError::Api(_) => {
                    CloudErrorKind::Api
                }
            },
            CloudError::LogStore { source } => match source {
                LogStoreError::GroupNotFound(_) | LogStoreError::StreamNotFound(_) => {
                    CloudErrorKind::LogsUnavailable
                }
                LogStoreError::Api(_) => CloudErrorKind::Api,
            },
        }
    }
}

impl From<ContainerServiceError> for CloudError {
    fn from(source: ContainerServiceError) -> Self {
        CloudError::ContainerService { source }
    }
}

impl From<LoadBalancerError> for CloudError {
    fn from(source: LoadBalancerError) -> Self {
        CloudError::LoadBalancer { source }
    }
}

impl From<LogStoreError> for CloudError {
    fn from(source: LogStoreError) -> Self {
        CloudError::LogStore { source }
    }
}
