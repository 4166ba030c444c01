// ABOUTME: Log store trait for fetching recent task logs.
// ABOUTME: Only used best-effort for rollback diagnostics.

use super::types::LogEvent;
use async_trait::async_trait;

/// Read access to the log store tasks ship their output to.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// List stream names in a group, most recently written first.
    async fn describe_log_streams(
        &self,
        group: &str,
        limit: usize,
    ) -> Result<Vec<String>, LogStoreError>;

    /// Fetch the events of one stream.
    async fn get_log_events(
        &self,
        group: &str,
        stream: &str,
    ) -> Result<Vec<LogEvent>, LogStoreError>;
}

/// Errors from log store operations.
#[derive(Debug, thiserror::Error)]
pub enum LogStoreError {
    #[error("log group not found: {0}")]
    GroupNotFound(String),

    #[error("log stream not found: {0}")]
    StreamNotFound(String),

    #[error("api error: {0}")]
    Api(String),
}
