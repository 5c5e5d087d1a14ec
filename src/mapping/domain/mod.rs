//! Domain model for issue/task-run mappings.

mod error;
mod ids;
mod mapping;
mod status;

pub use error::{MappingDomainError, ParseRunStatusError};
pub use ids::{IssueId, MappingId, TaskRunId};
pub use mapping::{PersistedMappingData, TaskRunMapping};
pub use status::RunStatus;
