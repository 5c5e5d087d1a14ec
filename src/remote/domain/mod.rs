//! Domain types and error taxonomy for the remote automation API.

use crate::mapping::domain::{RunStatus, TaskRunId};
use std::time::Duration;
use thiserror::Error;

/// A run accepted by the remote engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedTask {
    /// Identifier assigned by the remote engine.
    pub task_run_id: TaskRunId,
    /// Status reported at acceptance, normally [`RunStatus::Queued`].
    pub status: RunStatus,
}

/// Status snapshot of a remote run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTaskStatus {
    /// Remote run identifier.
    pub task_run_id: TaskRunId,
    /// Status reported by the remote engine.
    pub status: RunStatus,
}

/// Errors surfaced by remote client implementations.
///
/// The retry decorator consults [`RemoteClientError::is_retryable`]; after
/// retry exhaustion the original error is returned to the caller unchanged.
#[derive(Debug, Clone, Error)]
pub enum RemoteClientError {
    /// The credential was rejected (401/403). Not retryable.
    #[error("remote API rejected credentials (status {status})")]
    Auth {
        /// HTTP status that triggered the rejection.
        status: u16,
    },

    /// The addressed resource does not exist (404). Not retryable.
    #[error("remote resource not found")]
    NotFound,

    /// The request was rejected as invalid (400/422). Not retryable.
    #[error("remote API rejected request (status {status}): {message}")]
    Validation {
        /// HTTP status of the rejection.
        status: u16,
        /// Response body excerpt.
        message: String,
    },

    /// The caller is being throttled (429). Retryable, honouring the
    /// server-provided delay when present.
    #[error("remote API rate limited")]
    RateLimited {
        /// Server-provided minimum wait before the next attempt.
        retry_after: Option<Duration>,
    },

    /// The remote engine failed (5xx). Retryable.
    #[error("remote API server error (status {status})")]
    Server {
        /// HTTP status of the failure.
        status: u16,
    },

    /// The request never completed (connect failure, timeout). Retryable.
    #[error("remote API network error: {0}")]
    Network(String),

    /// The response did not match the wire contract. Not retryable.
    #[error("remote API protocol error: {0}")]
    Protocol(String),
}

impl RemoteClientError {
    /// Returns whether another attempt could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Server { .. } | Self::Network(_) => true,
            Self::Auth { .. } | Self::NotFound | Self::Validation { .. } | Self::Protocol(_) => {
                false
            }
        }
    }

    /// Returns the server-provided retry delay, when one was given.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
