//! Port contract for the remote automation API.

use crate::config::domain::RemoteProjectId;
use crate::mapping::domain::{IssueId, TaskRunId};
use crate::remote::domain::{QueuedTask, RemoteClientError, RemoteTaskStatus};
use async_trait::async_trait;

/// Result type for remote client operations.
pub type RemoteClientResult<T> = Result<T, RemoteClientError>;

/// Authenticated client to the remote task-automation engine.
///
/// Implementations must not invent idempotency keys: the remote protocol
/// defines none, so a retried queue call is a new request from the remote
/// engine's point of view. Retrying is therefore the decorator's decision,
/// never an implicit behaviour of an adapter.
#[async_trait]
pub trait RemoteTaskClient: Send + Sync {
    /// Queues a new task run for a work item.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteClientError`] classified per the error taxonomy.
    async fn queue_task(
        &self,
        remote_project_id: &RemoteProjectId,
        issue_id: &IssueId,
        title: &str,
        description: &str,
    ) -> RemoteClientResult<QueuedTask>;

    /// Fetches the current status of a run.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteClientError`] classified per the error taxonomy.
    async fn get_task_status(&self, task_run_id: &TaskRunId) -> RemoteClientResult<RemoteTaskStatus>;

    /// Requests cancellation of a run.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteClientError`] classified per the error taxonomy.
    async fn cancel_task(&self, task_run_id: &TaskRunId) -> RemoteClientResult<RemoteTaskStatus>;

    /// Fetches the log lines of a run.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteClientError`] classified per the error taxonomy.
    async fn get_task_logs(&self, task_run_id: &TaskRunId) -> RemoteClientResult<Vec<String>>;
}
