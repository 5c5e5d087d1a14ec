//! Automation settings value objects.

use super::{ConfigDomainError, ProjectId, RemoteProjectId};
use serde::{Deserialize, Serialize};

/// Validated trio of tracker state names driving the automation.
///
/// The ready name triggers queuing, the in-progress name is applied after a
/// task is accepted remotely, and the review name is applied on completion.
/// Construction rejects empty or colliding names, so every held value
/// satisfies the distinctness invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerStateNames {
    ready: String,
    in_progress: String,
    review: String,
}

impl TrackerStateNames {
    /// Creates a validated set of tracker state names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigDomainError::EmptyStateName`] when any name is empty
    /// after trimming, or [`ConfigDomainError::CollidingStateNames`] when two
    /// names are equal.
    pub fn new(
        ready: impl Into<String>,
        in_progress: impl Into<String>,
        review: impl Into<String>,
    ) -> Result<Self, ConfigDomainError> {
        let ready_name = normalize(ready.into(), "ready")?;
        let in_progress_name = normalize(in_progress.into(), "in_progress")?;
        let review_name = normalize(review.into(), "review")?;

        if ready_name == in_progress_name || ready_name == review_name {
            return Err(ConfigDomainError::CollidingStateNames(ready_name));
        }
        if in_progress_name == review_name {
            return Err(ConfigDomainError::CollidingStateNames(in_progress_name));
        }

        Ok(Self {
            ready: ready_name,
            in_progress: in_progress_name,
            review: review_name,
        })
    }

    /// Returns the state name that triggers queuing.
    #[must_use]
    pub fn ready(&self) -> &str {
        &self.ready
    }

    /// Returns the state name applied after remote acceptance.
    #[must_use]
    pub fn in_progress(&self) -> &str {
        &self.in_progress
    }

    /// Returns the state name applied on successful completion.
    #[must_use]
    pub fn review(&self) -> &str {
        &self.review
    }
}

fn normalize(value: String, field: &'static str) -> Result<String, ConfigDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigDomainError::EmptyStateName(field));
    }
    Ok(trimmed.to_owned())
}

/// Per-project automation settings, read-only to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationConfig {
    project_id: ProjectId,
    remote_project_id: RemoteProjectId,
    enabled: bool,
    state_names: TrackerStateNames,
}

impl AutomationConfig {
    /// Creates an automation configuration from validated components.
    #[must_use]
    pub const fn new(
        project_id: ProjectId,
        remote_project_id: RemoteProjectId,
        enabled: bool,
        state_names: TrackerStateNames,
    ) -> Self {
        Self {
            project_id,
            remote_project_id,
            enabled,
            state_names,
        }
    }

    /// Returns the tracker project identifier.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Returns the remote engine project identifier.
    #[must_use]
    pub const fn remote_project_id(&self) -> &RemoteProjectId {
        &self.remote_project_id
    }

    /// Returns whether automation is enabled for the project.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the configured tracker state names.
    #[must_use]
    pub const fn state_names(&self) -> &TrackerStateNames {
        &self.state_names
    }
}
