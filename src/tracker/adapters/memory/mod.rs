//! Recording in-memory tracker for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::mapping::domain::IssueId;
use crate::tracker::ports::{IssueTracker, TrackerError, TrackerResult};

/// Thread-safe in-memory tracker recording states and notes per issue.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueTracker {
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackerState {
    states: HashMap<IssueId, Vec<String>>,
    notes: HashMap<IssueId, Vec<String>>,
}

impl InMemoryIssueTracker {
    /// Creates an empty in-memory tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state of an issue, if one was ever set.
    #[must_use]
    pub fn current_state(&self, issue_id: &IssueId) -> Option<String> {
        let state = self.state.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        state
            .states
            .get(issue_id)
            .and_then(|history| history.last().cloned())
    }

    /// Returns the full state history of an issue.
    #[must_use]
    pub fn state_history(&self, issue_id: &IssueId) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.states.get(issue_id).cloned().unwrap_or_default()
    }

    /// Returns the notes appended to an issue, oldest first.
    ///
    /// Lock poisoning is recovered from; these accessors are assertion
    /// helpers and never fail.
    #[must_use]
    pub fn notes(&self, issue_id: &IssueId) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.notes.get(issue_id).cloned().unwrap_or_default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TrackerError {
    TrackerError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl IssueTracker for InMemoryIssueTracker {
    async fn set_state(&self, issue_id: &IssueId, state_name: &str) -> TrackerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .states
            .entry(issue_id.clone())
            .or_default()
            .push(state_name.to_owned());
        Ok(())
    }

    async fn append_note(&self, issue_id: &IssueId, note: &str) -> TrackerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .notes
            .entry(issue_id.clone())
            .or_default()
            .push(note.to_owned());
        Ok(())
    }
}
