//! Inbound path: verify, order, and apply remote lifecycle events.

use crate::bridge::domain::{EventKind, EventPayload, InboundEnvelope};
use crate::bridge::signature::{SignatureError, WebhookVerifier};
use crate::config::domain::StateMapper;
use crate::config::ports::{ConfigStore, ConfigStoreError};
use crate::mapping::domain::{RunStatus, TaskRunId, TaskRunMapping};
use crate::mapping::ports::{MappingStore, MappingStoreError};
use crate::tracker::ports::{IssueTracker, TrackerError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Acknowledged outcome of an inbound delivery.
///
/// Every variant is a success from the sender's point of view; duplicates,
/// stale events, and unknown types are acknowledged so the sender stops
/// redelivering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receipt {
    /// A status was applied to the mapping.
    Applied {
        /// The status written.
        status: RunStatus,
    },
    /// Pull-request metadata was attached without a status change.
    PrAttached,
    /// The event had already been applied; replay was a no-op.
    AlreadyApplied,
    /// The event was refused by the ordering rule and was discarded.
    Stale,
    /// The event type is unknown to this version; acknowledged as a no-op.
    Ignored {
        /// The unrecognized type tag.
        event_type: String,
    },
}

/// Errors surfaced to the webhook sender.
///
/// [`WebhookError::http_status`] gives the response code a host HTTP layer
/// should return; non-success responses make the sender redeliver, which is
/// safe because processing is idempotent.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The signature header was missing or did not match the body.
    #[error("signature verification failed: {0}")]
    Unauthorized(#[from] SignatureError),

    /// The payload was not a valid event envelope.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// No mapping exists for the event's task-run identifier.
    #[error("unknown task run: {0}")]
    UnknownTaskRun(String),

    /// Config lookup failed while applying tracker effects.
    #[error(transparent)]
    Config(#[from] ConfigStoreError),

    /// Mapping persistence failed.
    #[error(transparent)]
    Store(#[from] MappingStoreError),

    /// The tracker rejected an update.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

impl WebhookError {
    /// Returns the HTTP status code this error maps to.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Malformed(_) => 400,
            Self::UnknownTaskRun(_) => 404,
            Self::Config(_) | Self::Store(_) | Self::Tracker(_) => 500,
        }
    }
}

/// Inbound webhook processor.
///
/// Performs only local reads and writes; no outbound remote calls happen on
/// this path, so handling completes within a deterministic bound.
#[derive(Clone)]
pub struct EventReceiver<S, M, T>
where
    S: ConfigStore,
    M: MappingStore,
    T: IssueTracker,
{
    configs: Arc<S>,
    mappings: Arc<M>,
    tracker: Arc<T>,
    verifier: WebhookVerifier,
}

impl<S, M, T> EventReceiver<S, M, T>
where
    S: ConfigStore,
    M: MappingStore,
    T: IssueTracker,
{
    /// Creates a new event receiver.
    #[must_use]
    pub const fn new(
        configs: Arc<S>,
        mappings: Arc<M>,
        tracker: Arc<T>,
        verifier: WebhookVerifier,
    ) -> Self {
        Self {
            configs,
            mappings,
            tracker,
            verifier,
        }
    }

    /// Processes a raw inbound delivery.
    ///
    /// The signature is checked over the exact raw bytes before anything is
    /// parsed or looked up. Duplicate and out-of-order deliveries are
    /// acknowledged without mutation.
    ///
    /// # Errors
    ///
    /// Returns a [`WebhookError`]; see [`WebhookError::http_status`] for
    /// the sender-facing mapping.
    pub async fn receive(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<Receipt, WebhookError> {
        if let Err(err) = self.verifier.verify(raw_body, signature) {
            tracing::warn!(error = %err, "rejected webhook delivery");
            return Err(WebhookError::Unauthorized(err));
        }

        let envelope: InboundEnvelope = serde_json::from_slice(raw_body)
            .map_err(|err| WebhookError::Malformed(err.to_string()))?;
        let task_run_id = TaskRunId::new(envelope.task_run_id())
            .map_err(|err| WebhookError::Malformed(err.to_string()))?;

        let Some(mapping) = self.mappings.find_by_task_run(&task_run_id).await? else {
            tracing::debug!(task_run = %task_run_id, "event for unknown task run");
            return Err(WebhookError::UnknownTaskRun(task_run_id.to_string()));
        };

        match envelope.kind() {
            EventKind::TaskStarted => {
                self.apply_status(mapping, RunStatus::Running, &envelope, None)
                    .await
            }
            EventKind::TaskCompleted => {
                let payload = parse_payload(&envelope)?;
                self.apply_status(mapping, RunStatus::Success, &envelope, Some(payload))
                    .await
            }
            EventKind::TaskFailed => {
                let payload = parse_payload(&envelope)?;
                self.apply_status(mapping, RunStatus::Failed, &envelope, Some(payload))
                    .await
            }
            EventKind::PrCreated => {
                let payload = parse_payload(&envelope)?;
                self.attach_pr(mapping, payload).await
            }
            EventKind::Unknown(event_type) => {
                tracing::info!(event_type, task_run = %task_run_id, "ignoring unknown event type");
                Ok(Receipt::Ignored { event_type })
            }
        }
    }

    /// Applies a status-bearing event under the ordering rule.
    async fn apply_status(
        &self,
        mut mapping: TaskRunMapping,
        status: RunStatus,
        envelope: &InboundEnvelope,
        payload: Option<EventPayload>,
    ) -> Result<Receipt, WebhookError> {
        let occurred_at = envelope.occurred_at();
        if !mapping.apply_status(status, occurred_at) {
            return Ok(acknowledge_unapplied(&mapping, envelope));
        }

        if status == RunStatus::Success {
            if let Some(url) = payload.as_ref().and_then(|p| p.pr_url.as_deref()) {
                mapping.attach_pr_url(url);
            }
        }

        // Tracker effects land before the mapping write: once
        // `last_event_at` has advanced, a redelivery is acknowledged
        // without re-running them, so they must already have succeeded.
        match status {
            RunStatus::Success => self.apply_completion_effects(&mapping).await?,
            RunStatus::Failed => {
                let reason = payload
                    .as_ref()
                    .and_then(|p| p.reason.as_deref())
                    .unwrap_or("no reason given");
                let note =
                    format!("Automation run {} failed: {reason}", mapping.task_run_id());
                self.tracker.append_note(mapping.issue_id(), &note).await?;
            }
            RunStatus::Queued | RunStatus::Running | RunStatus::Cancelled => {}
        }
        self.mappings.update(&mapping).await?;

        tracing::info!(
            task_run = %mapping.task_run_id(),
            status = %status,
            "applied lifecycle event"
        );
        Ok(Receipt::Applied { status })
    }

    /// Moves the tracker issue to review and appends a completion note.
    async fn apply_completion_effects(
        &self,
        mapping: &TaskRunMapping,
    ) -> Result<(), WebhookError> {
        let config = self.configs.find_by_project(mapping.project_id()).await?;
        match config {
            Some(config) => {
                let mapper = StateMapper::new(config.state_names().clone());
                if let Some(state) = mapper.tracker_state_for(RunStatus::Success) {
                    self.tracker.set_state(mapping.issue_id(), state).await?;
                }
            }
            None => {
                // The config was removed after queuing; the mapping update
                // stands but there is no review state to apply.
                tracing::warn!(
                    project = %mapping.project_id(),
                    "no automation config for completed run, skipping tracker state"
                );
            }
        }

        let note = mapping.pr_url().map_or_else(
            || format!("Automation run {} completed.", mapping.task_run_id()),
            |url| {
                format!(
                    "Automation run {} completed; pull request: {url}",
                    mapping.task_run_id()
                )
            },
        );
        self.tracker.append_note(mapping.issue_id(), &note).await?;
        Ok(())
    }

    /// Attaches PR metadata outside the ordering rule.
    async fn attach_pr(
        &self,
        mut mapping: TaskRunMapping,
        payload: EventPayload,
    ) -> Result<Receipt, WebhookError> {
        let Some(url) = payload.pr_url else {
            return Err(WebhookError::Malformed(
                "pr.created event without pr_url".to_owned(),
            ));
        };
        mapping.attach_pr_url(url);
        self.mappings.update(&mapping).await?;
        Ok(Receipt::PrAttached)
    }
}

fn parse_payload(envelope: &InboundEnvelope) -> Result<EventPayload, WebhookError> {
    envelope
        .payload()
        .map_err(|err| WebhookError::Malformed(err.to_string()))
}

/// Classifies an event the ordering rule refused to apply.
fn acknowledge_unapplied(mapping: &TaskRunMapping, envelope: &InboundEnvelope) -> Receipt {
    let occurred_at: DateTime<Utc> = envelope.occurred_at();
    if occurred_at == mapping.last_event_at() {
        tracing::debug!(
            task_run = %mapping.task_run_id(),
            event_type = envelope.event_type(),
            "replayed event acknowledged without mutation"
        );
        Receipt::AlreadyApplied
    } else {
        tracing::debug!(
            task_run = %mapping.task_run_id(),
            event_type = envelope.event_type(),
            "event refused by ordering rule, status retained"
        );
        Receipt::Stale
    }
}
