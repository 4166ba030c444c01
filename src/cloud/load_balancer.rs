// ABOUTME: Load balancer trait for target group health-check tuning.
// ABOUTME: Only exercised by unsafe mode deployments.

use super::types::{HealthCheckThresholds, TargetGroupDescription};
use crate::types::TargetGroupArn;
use async_trait::async_trait;

/// Target-group operations on the load balancer fronting a service.
#[async_trait]
pub trait LoadBalancer: Send + Sync {
    /// Describe a target group, including its current health-check thresholds.
    async fn describe_target_group(
        &self,
        arn: &TargetGroupArn,
    ) -> Result<TargetGroupDescription, LoadBalancerError>;

    /// Overwrite a target group's health-check thresholds.
    async fn modify_target_group(
        &self,
        arn: &TargetGroupArn,
        thresholds: &HealthCheckThresholds,
    ) -> Result<(), LoadBalancerError>;
}

/// Errors from load balancer operations.
#[derive(Debug, thiserror::Error)]
pub enum LoadBalancerError {
    #[error("target group not found: {0}")]
    TargetGroupNotFound(String),

    #[error("invalid health check configuration: {0}")]
    InvalidThresholds(String),

    #[error("api error: {0}")]
    Api(String),
}
