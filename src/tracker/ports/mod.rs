//! Port contract for issue tracker write-back.

use crate::mapping::domain::IssueId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Write access to the host issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Moves an issue to the given tracker state.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] when the tracker rejects the
    /// update.
    async fn set_state(&self, issue_id: &IssueId, state_name: &str) -> TrackerResult<()>;

    /// Appends a note to an issue.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] when the tracker rejects the
    /// note.
    async fn append_note(&self, issue_id: &IssueId, note: &str) -> TrackerResult<()>;
}

/// Errors returned by tracker implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// Tracker-side failure.
    #[error("tracker error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerError {
    /// Wraps a tracker-side error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
