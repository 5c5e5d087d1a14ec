//! Retrying decorator over any remote client.

use crate::config::domain::RemoteProjectId;
use crate::mapping::domain::{IssueId, TaskRunId};
use crate::remote::domain::{QueuedTask, RemoteTaskStatus};
use crate::remote::ports::{RemoteClientResult, RemoteTaskClient};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Bounded exponential backoff parameters for retryable remote errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first (minimum 1).
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per subsequent attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Returns the delay to wait after a failed attempt (1-based).
    ///
    /// A server-provided delay acts as a floor: the remote engine knows its
    /// own throttling window better than our backoff curve does.
    #[must_use]
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let exponent = attempt.saturating_sub(1).min(10);
        let scaled = self
            .base_delay
            .saturating_mul(2_u32.saturating_pow(exponent))
            .min(self.max_delay);
        retry_after.map_or(scaled, |server_delay| server_delay.max(scaled))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Decorator adding bounded retries to a [`RemoteTaskClient`].
///
/// Only errors reporting themselves retryable are re-attempted; after
/// exhaustion the original error is returned unchanged so callers see the
/// same taxonomy with or without the decorator.
#[derive(Debug, Clone)]
pub struct RetryingClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C> RetryingClient<C>
where
    C: RemoteTaskClient,
{
    /// Wraps a client with the given retry policy.
    #[must_use]
    pub const fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Returns the wrapped client.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.inner
    }

    async fn run_with_retry<T, Fut>(
        &self,
        operation: &'static str,
        mut attempt_fn: impl FnMut() -> Fut + Send,
    ) -> RemoteClientResult<T>
    where
        Fut: Future<Output = RemoteClientResult<T>> + Send,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            match attempt_fn().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.policy.max_attempts.max(1) && err.is_retryable() => {
                    let delay = self.policy.delay_for(attempt, err.retry_after());
                    tracing::warn!(
                        operation,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "remote call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl<C> RemoteTaskClient for RetryingClient<C>
where
    C: RemoteTaskClient,
{
    async fn queue_task(
        &self,
        remote_project_id: &RemoteProjectId,
        issue_id: &IssueId,
        title: &str,
        description: &str,
    ) -> RemoteClientResult<QueuedTask> {
        self.run_with_retry("queue_task", || {
            self.inner
                .queue_task(remote_project_id, issue_id, title, description)
        })
        .await
    }

    async fn get_task_status(
        &self,
        task_run_id: &TaskRunId,
    ) -> RemoteClientResult<RemoteTaskStatus> {
        self.run_with_retry("get_task_status", || self.inner.get_task_status(task_run_id))
            .await
    }

    async fn cancel_task(&self, task_run_id: &TaskRunId) -> RemoteClientResult<RemoteTaskStatus> {
        self.run_with_retry("cancel_task", || self.inner.cancel_task(task_run_id))
            .await
    }

    async fn get_task_logs(&self, task_run_id: &TaskRunId) -> RemoteClientResult<Vec<String>> {
        self.run_with_retry("get_task_logs", || self.inner.get_task_logs(task_run_id))
            .await
    }
}
