//! Error types for automation-config validation.

use thiserror::Error;

/// Errors returned while constructing configuration domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigDomainError {
    /// The tracker project identifier is empty.
    #[error("project identifier must not be empty")]
    EmptyProjectId,

    /// The remote project identifier is empty.
    #[error("remote project identifier must not be empty")]
    EmptyRemoteProjectId,

    /// A configured tracker state name is empty after trimming.
    #[error("tracker state name for '{0}' must not be empty")]
    EmptyStateName(&'static str),

    /// Two configured tracker state names collide.
    #[error("tracker state names must be pairwise distinct, '{0}' is repeated")]
    CollidingStateNames(String),
}
