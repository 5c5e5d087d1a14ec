//! Mapping aggregate root tying a tracker issue to a remote task run.

use super::{IssueId, MappingId, RunStatus, TaskRunId};
use crate::config::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Association between a tracker issue and a remote task run.
///
/// Created by the outbound trigger path once the remote engine has accepted
/// a run; mutated only by the inbound event path thereafter. Status changes
/// are last-write-wins by event timestamp: [`TaskRunMapping::apply_status`]
/// refuses anything not strictly newer than the last applied event and
/// never revives a terminal run, so duplicate and out-of-order deliveries
/// can neither regress the status nor bring a finished run back to life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRunMapping {
    id: MappingId,
    issue_id: IssueId,
    project_id: ProjectId,
    task_run_id: TaskRunId,
    status: RunStatus,
    pr_url: Option<String>,
    last_event_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMappingData {
    /// Persisted mapping identifier.
    pub id: MappingId,
    /// Persisted tracker issue identifier.
    pub issue_id: IssueId,
    /// Persisted tracker project identifier.
    pub project_id: ProjectId,
    /// Persisted remote task-run identifier.
    pub task_run_id: TaskRunId,
    /// Persisted canonical status.
    pub status: RunStatus,
    /// Persisted pull-request URL, if any.
    pub pr_url: Option<String>,
    /// Timestamp of the last applied lifecycle event.
    pub last_event_at: DateTime<Utc>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskRunMapping {
    /// Creates a freshly queued mapping.
    ///
    /// The last-applied event timestamp starts at creation time, so the
    /// ordering rule measures inbound events against the moment of queuing.
    #[must_use]
    pub fn new_queued(
        issue_id: IssueId,
        project_id: ProjectId,
        task_run_id: TaskRunId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: MappingId::new(),
            issue_id,
            project_id,
            task_run_id,
            status: RunStatus::Queued,
            pr_url: None,
            last_event_at: timestamp,
            created_at: timestamp,
        }
    }

    /// Reconstructs a mapping from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMappingData) -> Self {
        Self {
            id: data.id,
            issue_id: data.issue_id,
            project_id: data.project_id,
            task_run_id: data.task_run_id,
            status: data.status,
            pr_url: data.pr_url,
            last_event_at: data.last_event_at,
            created_at: data.created_at,
        }
    }

    /// Returns the mapping identifier.
    #[must_use]
    pub const fn id(&self) -> MappingId {
        self.id
    }

    /// Returns the tracker issue identifier.
    #[must_use]
    pub const fn issue_id(&self) -> &IssueId {
        &self.issue_id
    }

    /// Returns the tracker project identifier.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Returns the remote task-run identifier.
    #[must_use]
    pub const fn task_run_id(&self) -> &TaskRunId {
        &self.task_run_id
    }

    /// Returns the canonical status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Returns whether the mapping counts against the single-active-run
    /// invariant.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Returns the associated pull-request URL, if any.
    #[must_use]
    pub fn pr_url(&self) -> Option<&str> {
        self.pr_url.as_deref()
    }

    /// Returns the timestamp of the last applied lifecycle event.
    #[must_use]
    pub const fn last_event_at(&self) -> DateTime<Utc> {
        self.last_event_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies a status carried by an event that occurred at `occurred_at`.
    ///
    /// Returns `true` and records the event timestamp only when the event is
    /// strictly newer than the last applied one. Older or replayed events
    /// leave the mapping untouched and return `false`; callers acknowledge
    /// them without treating them as errors.
    ///
    /// A terminal status is only ever overridden by another, newer terminal
    /// status: a completion that genuinely post-dates a cancellation wins,
    /// but a late start event cannot revive a finished run. The issue may
    /// already have queued a successor, and a revived run would break the
    /// single-active-run invariant.
    pub fn apply_status(&mut self, status: RunStatus, occurred_at: DateTime<Utc>) -> bool {
        if occurred_at <= self.last_event_at {
            return false;
        }
        if self.status.is_terminal() && !status.is_terminal() {
            return false;
        }
        self.status = status;
        self.last_event_at = occurred_at;
        true
    }

    /// Attaches or overwrites the pull-request URL.
    ///
    /// PR metadata is not subject to the ordering rule; the field is always
    /// overwritable.
    pub fn attach_pr_url(&mut self, url: impl Into<String>) {
        self.pr_url = Some(url.into());
    }
}
