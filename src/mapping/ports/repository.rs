//! Store port for issue/task-run mappings.

use crate::mapping::domain::{IssueId, MappingId, TaskRunId, TaskRunMapping};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for mapping store operations.
pub type MappingStoreResult<T> = Result<T, MappingStoreError>;

/// Mapping persistence contract.
///
/// Implementations must make [`MappingStore::create_active`] atomic with
/// respect to the single-active-mapping-per-issue invariant: two concurrent
/// creations for the same issue must resolve to exactly one stored row, the
/// loser receiving [`MappingStoreError::ActiveMappingExists`]. An
/// application-level read-then-insert is not an acceptable implementation.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Stores a new mapping, enforcing the single-active-run invariant.
    ///
    /// # Errors
    ///
    /// Returns [`MappingStoreError::ActiveMappingExists`] when the issue
    /// already has a mapping in a non-terminal status, or
    /// [`MappingStoreError::DuplicateTaskRun`] when the task-run identifier
    /// is already stored.
    async fn create_active(&self, mapping: &TaskRunMapping) -> MappingStoreResult<()>;

    /// Persists changes to an existing mapping (status, PR URL, last event
    /// timestamp).
    ///
    /// # Errors
    ///
    /// Returns [`MappingStoreError::NotFound`] when the mapping does not
    /// exist.
    async fn update(&self, mapping: &TaskRunMapping) -> MappingStoreResult<()>;

    /// Finds the mapping for a remote task-run identifier.
    ///
    /// Returns `None` when the run is unknown.
    async fn find_by_task_run(
        &self,
        task_run_id: &TaskRunId,
    ) -> MappingStoreResult<Option<TaskRunMapping>>;

    /// Finds the issue's mapping in a non-terminal status, if one exists.
    async fn find_active_by_issue(
        &self,
        issue_id: &IssueId,
    ) -> MappingStoreResult<Option<TaskRunMapping>>;
}

/// Errors returned by mapping store implementations.
#[derive(Debug, Clone, Error)]
pub enum MappingStoreError {
    /// The issue already has a mapping in a non-terminal status.
    #[error("issue {0} already has an active mapping")]
    ActiveMappingExists(IssueId),

    /// A mapping for the task-run identifier already exists.
    #[error("duplicate task-run identifier: {0}")]
    DuplicateTaskRun(TaskRunId),

    /// The mapping was not found.
    #[error("mapping not found: {0}")]
    NotFound(MappingId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MappingStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
