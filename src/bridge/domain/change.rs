//! Tracker state-change callback payload.

use crate::config::domain::ProjectId;
use crate::mapping::domain::IssueId;

/// A persisted tracker state change, as reported by the host's save path.
///
/// This is a plain callback contract: whatever persistence hook the host
/// tracker uses invokes the watcher with one of these, so the core has no
/// dependency on any framework's signal mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    issue_id: IssueId,
    project_id: ProjectId,
    previous_state: String,
    new_state: String,
    title: String,
    description: String,
}

impl StateChange {
    /// Creates a state-change notification.
    #[must_use]
    pub fn new(
        issue_id: IssueId,
        project_id: ProjectId,
        previous_state: impl Into<String>,
        new_state: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            issue_id,
            project_id,
            previous_state: previous_state.into(),
            new_state: new_state.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn issue_id(&self) -> &IssueId {
        &self.issue_id
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Returns the state name before the save.
    #[must_use]
    pub fn previous_state(&self) -> &str {
        &self.previous_state
    }

    /// Returns the state name after the save.
    #[must_use]
    pub fn new_state(&self) -> &str {
        &self.new_state
    }

    /// Returns the issue title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the issue description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the save actually changed the state name.
    ///
    /// Re-saves without a state change must never trigger automation.
    #[must_use]
    pub fn is_transition(&self) -> bool {
        self.previous_state != self.new_state
    }
}
