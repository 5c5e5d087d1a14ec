//! Domain model for per-project automation settings.
//!
//! Configuration values are validated at construction so every
//! [`AutomationConfig`] held by the core satisfies the state-name
//! distinctness invariant.

mod error;
mod ids;
mod settings;
mod state_map;

pub use error::ConfigDomainError;
pub use ids::{ProjectId, RemoteProjectId};
pub use settings::{AutomationConfig, TrackerStateNames};
pub use state_map::StateMapper;
