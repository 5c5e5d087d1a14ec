//! Read-only store port for per-project automation settings.

use crate::config::domain::{AutomationConfig, ProjectId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for config store operations.
pub type ConfigStoreResult<T> = Result<T, ConfigStoreError>;

/// Read access to automation configuration.
///
/// The core never writes configs; administrative tooling owns mutation.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Finds the automation configuration for a project.
    ///
    /// Returns `None` when the project has no configuration.
    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> ConfigStoreResult<Option<AutomationConfig>>;
}

/// Errors returned by config store implementations.
#[derive(Debug, Clone, Error)]
pub enum ConfigStoreError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConfigStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
