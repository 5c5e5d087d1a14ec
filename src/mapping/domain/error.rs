//! Error types for mapping domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing mapping domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MappingDomainError {
    /// The tracker issue identifier is empty.
    #[error("issue identifier must not be empty")]
    EmptyIssueId,

    /// The remote task-run identifier is empty.
    #[error("task-run identifier must not be empty")]
    EmptyTaskRunId,
}

/// Error returned while parsing run statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown run status: {0}")]
pub struct ParseRunStatusError(pub String);
