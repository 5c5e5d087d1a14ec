//! In-memory config store for tests and embedded hosts.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::{
    domain::{AutomationConfig, ProjectId},
    ports::{ConfigStore, ConfigStoreError, ConfigStoreResult},
};
use async_trait::async_trait;

/// Thread-safe in-memory config store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    configs: Arc<RwLock<HashMap<ProjectId, AutomationConfig>>>,
}

impl InMemoryConfigStore {
    /// Creates an empty in-memory config store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a project configuration.
    ///
    /// This is a seeding hook for hosts and tests; it is deliberately not
    /// part of the [`ConfigStore`] port, which is read-only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStoreError::Persistence`] when the backing lock is
    /// poisoned.
    pub fn insert(&self, config: AutomationConfig) -> ConfigStoreResult<()> {
        let mut configs = self
            .configs
            .write()
            .map_err(|err| ConfigStoreError::persistence(std::io::Error::other(err.to_string())))?;
        configs.insert(config.project_id().clone(), config);
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> ConfigStoreResult<Option<AutomationConfig>> {
        let configs = self
            .configs
            .read()
            .map_err(|err| ConfigStoreError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(configs.get(project_id).cloned())
    }
}
