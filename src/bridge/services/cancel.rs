//! User-initiated cancellation of an active run.

use crate::mapping::domain::{IssueId, RunStatus, TaskRunMapping};
use crate::mapping::ports::{MappingStore, MappingStoreError};
use crate::remote::domain::RemoteClientError;
use crate::remote::ports::RemoteTaskClient;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by cancellation.
#[derive(Debug, Error)]
pub enum CancelError {
    /// The issue has no mapping in a non-terminal status.
    #[error("issue {0} has no active run to cancel")]
    NoActiveRun(IssueId),

    /// The remote cancel call failed after retries.
    #[error("remote cancel call failed: {0}")]
    Remote(#[source] RemoteClientError),

    /// Mapping persistence failed.
    #[error(transparent)]
    Store(#[from] MappingStoreError),
}

/// Cancels an issue's active run, optimistically.
///
/// The mapping is moved to CANCELLED as soon as the remote engine
/// acknowledges; a lifecycle webhook racing the cancellation is reconciled
/// by the ordering rule, so a completion that genuinely post-dates the
/// cancellation still wins.
#[derive(Clone)]
pub struct CancelService<M, R, K>
where
    M: MappingStore,
    R: RemoteTaskClient,
    K: Clock + Send + Sync,
{
    mappings: Arc<M>,
    remote: Arc<R>,
    clock: Arc<K>,
}

impl<M, R, K> CancelService<M, R, K>
where
    M: MappingStore,
    R: RemoteTaskClient,
    K: Clock + Send + Sync,
{
    /// Creates a new cancel service.
    #[must_use]
    pub const fn new(mappings: Arc<M>, remote: Arc<R>, clock: Arc<K>) -> Self {
        Self {
            mappings,
            remote,
            clock,
        }
    }

    /// Cancels the active run for an issue.
    ///
    /// # Errors
    ///
    /// Returns [`CancelError::NoActiveRun`] when nothing is running,
    /// [`CancelError::Remote`] when the engine rejects the cancellation,
    /// or [`CancelError::Store`] when persistence fails.
    pub async fn cancel(&self, issue_id: &IssueId) -> Result<TaskRunMapping, CancelError> {
        let Some(mut mapping) = self.mappings.find_active_by_issue(issue_id).await? else {
            return Err(CancelError::NoActiveRun(issue_id.clone()));
        };

        self.remote
            .cancel_task(mapping.task_run_id())
            .await
            .map_err(CancelError::Remote)?;

        if mapping.apply_status(RunStatus::Cancelled, self.clock.utc()) {
            self.mappings.update(&mapping).await?;
            tracing::info!(
                issue = %issue_id,
                task_run = %mapping.task_run_id(),
                "cancelled remote run"
            );
        } else {
            // An event newer than our acknowledgment already landed; the
            // ordering rule says it wins.
            tracing::debug!(
                task_run = %mapping.task_run_id(),
                "cancellation superseded by newer lifecycle event"
            );
        }
        Ok(mapping)
    }
}
