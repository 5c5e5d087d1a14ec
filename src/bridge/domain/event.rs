//! Inbound webhook envelope and event classification.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// JSON envelope of an inbound lifecycle event.
///
/// Events are transient: they mutate a mapping but are not persisted as
/// domain entities. Replay safety comes from the mapping's last-applied
/// event timestamp, not from storing the events themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEnvelope {
    /// Event type tag, e.g. `task.completed`.
    #[serde(rename = "type")]
    event_type: String,
    /// Remote run the event belongs to.
    task_run_id: String,
    /// When the event occurred in the remote engine.
    occurred_at: DateTime<Utc>,
    /// Type-specific payload.
    #[serde(default)]
    data: Value,
}

impl InboundEnvelope {
    /// Returns the classified event kind.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        EventKind::from_tag(&self.event_type)
    }

    /// Returns the raw event type tag.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Returns the remote run identifier as received.
    #[must_use]
    pub fn task_run_id(&self) -> &str {
        &self.task_run_id
    }

    /// Returns the event timestamp.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Parses the type-specific payload.
    ///
    /// Unknown fields are ignored; missing fields default to `None` so the
    /// payload shape can grow without breaking older senders.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the payload is not an
    /// object of the expected shape.
    pub fn payload(&self) -> Result<EventPayload, serde_json::Error> {
        if self.data.is_null() {
            return Ok(EventPayload::default());
        }
        serde_json::from_value(self.data.clone())
    }
}

/// Classified inbound event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The run began executing.
    TaskStarted,
    /// The run finished successfully.
    TaskCompleted,
    /// The run finished with a failure.
    TaskFailed,
    /// A pull request was opened for the run.
    PrCreated,
    /// A type tag this version does not know. Acknowledged as a no-op.
    Unknown(String),
}

impl EventKind {
    /// Classifies a raw event type tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "task.started" => Self::TaskStarted,
            "task.completed" => Self::TaskCompleted,
            "task.failed" => Self::TaskFailed,
            "pr.created" => Self::PrCreated,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

/// Type-specific fields carried in the envelope's `data` object.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EventPayload {
    /// Pull-request URL, on `task.completed` and `pr.created`.
    #[serde(default)]
    pub pr_url: Option<String>,
    /// Human-readable failure reason, on `task.failed`.
    #[serde(default)]
    pub reason: Option<String>,
}
