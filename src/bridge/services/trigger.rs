//! Outbound path: watch tracker transitions and queue remote runs.

use crate::bridge::domain::StateChange;
use crate::config::domain::{RemoteProjectId, StateMapper};
use crate::config::ports::{ConfigStore, ConfigStoreError};
use crate::mapping::domain::{IssueId, TaskRunId, TaskRunMapping};
use crate::mapping::ports::{MappingStore, MappingStoreError};
use crate::remote::domain::RemoteClientError;
use crate::remote::ports::RemoteTaskClient;
use crate::tracker::ports::{IssueTracker, TrackerError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Why a state change did not trigger automation.
///
/// Every variant is an expected local condition, logged at low severity and
/// never surfaced to the tracker's save path as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The project has no automation configuration.
    ConfigMissing,
    /// Automation is disabled for the project.
    AutomationDisabled,
    /// The new state is not the configured ready state.
    NotReadyState,
    /// The save did not change the state name.
    NoOpResave,
    /// The issue already has a mapping in a non-terminal status.
    MappingAlreadyActive,
}

/// The deferred queue action produced by an eligible transition.
///
/// Evaluation is fast and local; the action carries everything the slow
/// network phase needs, so a host can hand it to a worker queue instead of
/// blocking the save path on the remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueTaskAction {
    issue_id: IssueId,
    project_id: crate::config::domain::ProjectId,
    remote_project_id: RemoteProjectId,
    in_progress_state: String,
    title: String,
    description: String,
}

impl QueueTaskAction {
    /// Returns the issue to queue a run for.
    #[must_use]
    pub const fn issue_id(&self) -> &IssueId {
        &self.issue_id
    }

    /// Returns the remote project the run is queued under.
    #[must_use]
    pub const fn remote_project_id(&self) -> &RemoteProjectId {
        &self.remote_project_id
    }
}

/// Result of evaluating a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerDecision {
    /// The transition is eligible; run the action.
    Fire(QueueTaskAction),
    /// The transition is not eligible; nothing to do.
    Skip(SkipReason),
}

/// Final outcome of handling a state change.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// A run was queued and a mapping created.
    Queued(TaskRunMapping),
    /// The change was ignored for an expected local reason.
    Skipped(SkipReason),
}

/// Errors surfaced by the outbound path.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Config lookup failed.
    #[error(transparent)]
    Config(#[from] ConfigStoreError),

    /// Mapping lookup failed during evaluation.
    #[error(transparent)]
    Store(#[from] MappingStoreError),

    /// The remote queue call failed after retries. No mapping was created
    /// and the tracker is untouched; the trigger attempt is recoverable.
    #[error("remote queue call failed: {0}")]
    Remote(#[source] RemoteClientError),

    /// The remote engine accepted a run but the local mapping write failed.
    ///
    /// A remote run now exists with no local record. This cannot be
    /// reconciled automatically and requires operator attention; the run
    /// identifier is carried for reconciliation tooling.
    #[error("remote run {task_run_id} accepted but mapping write failed: {source}")]
    Inconsistency {
        /// The orphaned remote run.
        task_run_id: TaskRunId,
        /// The failed local write.
        source: MappingStoreError,
    },

    /// The tracker rejected the post-queue state update. The mapping
    /// exists and inbound events will still apply.
    #[error("tracker update failed after queuing: {0}")]
    Tracker(#[source] TrackerError),
}

/// Outbound watcher: decides eligibility and queues remote runs.
#[derive(Clone)]
pub struct TransitionWatcher<S, M, R, T, K>
where
    S: ConfigStore,
    M: MappingStore,
    R: RemoteTaskClient,
    T: IssueTracker,
    K: Clock + Send + Sync,
{
    configs: Arc<S>,
    mappings: Arc<M>,
    remote: Arc<R>,
    tracker: Arc<T>,
    clock: Arc<K>,
}

impl<S, M, R, T, K> TransitionWatcher<S, M, R, T, K>
where
    S: ConfigStore,
    M: MappingStore,
    R: RemoteTaskClient,
    T: IssueTracker,
    K: Clock + Send + Sync,
{
    /// Creates a new transition watcher.
    #[must_use]
    pub const fn new(
        configs: Arc<S>,
        mappings: Arc<M>,
        remote: Arc<R>,
        tracker: Arc<T>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            configs,
            mappings,
            remote,
            tracker,
            clock,
        }
    }

    /// Decides whether a persisted state change should queue a remote run.
    ///
    /// Local-only: config lookup plus an advisory active-mapping pre-check.
    /// The pre-check improves skip reporting but is not relied on for
    /// correctness; the store's atomic insert in [`Self::fire`] is the
    /// arbiter under concurrency.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Config`] or [`TriggerError::Store`] when a
    /// lookup fails. Ineligibility is a [`TriggerDecision::Skip`], never an
    /// error.
    pub async fn evaluate(&self, change: &StateChange) -> Result<TriggerDecision, TriggerError> {
        let Some(config) = self.configs.find_by_project(change.project_id()).await? else {
            tracing::debug!(project = %change.project_id(), "no automation config, skipping");
            return Ok(TriggerDecision::Skip(SkipReason::ConfigMissing));
        };
        if !config.enabled() {
            tracing::debug!(project = %change.project_id(), "automation disabled, skipping");
            return Ok(TriggerDecision::Skip(SkipReason::AutomationDisabled));
        }

        let mapper = StateMapper::new(config.state_names().clone());
        if !mapper.is_ready_state(change.new_state()) {
            return Ok(TriggerDecision::Skip(SkipReason::NotReadyState));
        }
        if !change.is_transition() {
            tracing::debug!(issue = %change.issue_id(), "re-save without transition, skipping");
            return Ok(TriggerDecision::Skip(SkipReason::NoOpResave));
        }

        if let Some(active) = self.mappings.find_active_by_issue(change.issue_id()).await? {
            tracing::info!(
                issue = %change.issue_id(),
                task_run = %active.task_run_id(),
                "issue already has an active run, skipping"
            );
            return Ok(TriggerDecision::Skip(SkipReason::MappingAlreadyActive));
        }

        Ok(TriggerDecision::Fire(QueueTaskAction {
            issue_id: change.issue_id().clone(),
            project_id: change.project_id().clone(),
            remote_project_id: config.remote_project_id().clone(),
            in_progress_state: mapper.names().in_progress().to_owned(),
            title: change.title().to_owned(),
            description: change.description().to_owned(),
        }))
    }

    /// Runs the slow phase of an eligible transition.
    ///
    /// Queues the run remotely, then creates the mapping, then moves the
    /// tracker issue to the configured in-progress state. On remote failure
    /// nothing is persisted. A mapping write failure after remote
    /// acceptance is the one unrecoverable case and is logged at `error`
    /// before being surfaced.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Remote`], [`TriggerError::Inconsistency`],
    /// or [`TriggerError::Tracker`] as described above.
    pub async fn fire(&self, action: QueueTaskAction) -> Result<TaskRunMapping, TriggerError> {
        let queued = self
            .remote
            .queue_task(
                &action.remote_project_id,
                &action.issue_id,
                &action.title,
                &action.description,
            )
            .await
            .map_err(TriggerError::Remote)?;

        let mapping = TaskRunMapping::new_queued(
            action.issue_id.clone(),
            action.project_id.clone(),
            queued.task_run_id.clone(),
            &*self.clock,
        );

        if let Err(source) = self.mappings.create_active(&mapping).await {
            // The remote run exists but we have no record of it. Surfaced
            // loudly: reconciliation needs the orphaned run identifier.
            tracing::error!(
                issue = %action.issue_id,
                task_run = %queued.task_run_id,
                error = %source,
                "remote run accepted but mapping write failed, manual reconciliation required"
            );
            return Err(TriggerError::Inconsistency {
                task_run_id: queued.task_run_id,
                source,
            });
        }

        tracing::info!(
            issue = %action.issue_id,
            task_run = %mapping.task_run_id(),
            "queued remote run"
        );

        self.tracker
            .set_state(&action.issue_id, &action.in_progress_state)
            .await
            .map_err(TriggerError::Tracker)?;

        Ok(mapping)
    }

    /// Evaluates and, when eligible, fires in one call.
    ///
    /// Convenience for hosts that accept a bounded synchronous save path;
    /// hosts with a worker queue should call [`Self::evaluate`] inline and
    /// defer [`Self::fire`].
    ///
    /// # Errors
    ///
    /// Propagates errors from either phase.
    pub async fn handle(&self, change: &StateChange) -> Result<TriggerOutcome, TriggerError> {
        match self.evaluate(change).await? {
            TriggerDecision::Skip(reason) => Ok(TriggerOutcome::Skipped(reason)),
            TriggerDecision::Fire(action) => {
                let mapping = self.fire(action).await?;
                Ok(TriggerOutcome::Queued(mapping))
            }
        }
    }
}
