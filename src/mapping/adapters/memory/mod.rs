//! In-memory mapping store for tests and embedded hosts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::mapping::{
    domain::{IssueId, MappingId, TaskRunId, TaskRunMapping},
    ports::{MappingStore, MappingStoreError, MappingStoreResult},
};

/// Thread-safe in-memory mapping store.
///
/// All mutation happens under a single write lock, so the conditional
/// insert in [`MappingStore::create_active`] is atomic: the active-issue
/// check and the insert cannot interleave with another writer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMappingStore {
    state: Arc<RwLock<InMemoryMappingState>>,
}

#[derive(Debug, Default)]
struct InMemoryMappingState {
    mappings: HashMap<MappingId, TaskRunMapping>,
    run_index: HashMap<TaskRunId, MappingId>,
    active_issue_index: HashMap<IssueId, MappingId>,
}

impl InMemoryMappingStore {
    /// Creates an empty in-memory mapping store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> MappingStoreError {
    MappingStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn create_active(&self, mapping: &TaskRunMapping) -> MappingStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        if state.active_issue_index.contains_key(mapping.issue_id()) {
            return Err(MappingStoreError::ActiveMappingExists(
                mapping.issue_id().clone(),
            ));
        }
        if state.run_index.contains_key(mapping.task_run_id()) {
            return Err(MappingStoreError::DuplicateTaskRun(
                mapping.task_run_id().clone(),
            ));
        }

        state
            .run_index
            .insert(mapping.task_run_id().clone(), mapping.id());
        if mapping.is_active() {
            state
                .active_issue_index
                .insert(mapping.issue_id().clone(), mapping.id());
        }
        state.mappings.insert(mapping.id(), mapping.clone());
        Ok(())
    }

    async fn update(&self, mapping: &TaskRunMapping) -> MappingStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        if !state.mappings.contains_key(&mapping.id()) {
            return Err(MappingStoreError::NotFound(mapping.id()));
        }

        if mapping.is_active() {
            state
                .active_issue_index
                .insert(mapping.issue_id().clone(), mapping.id());
        } else {
            let held_by_this = state
                .active_issue_index
                .get(mapping.issue_id())
                .is_some_and(|held| *held == mapping.id());
            if held_by_this {
                state.active_issue_index.remove(mapping.issue_id());
            }
        }
        state.mappings.insert(mapping.id(), mapping.clone());
        Ok(())
    }

    async fn find_by_task_run(
        &self,
        task_run_id: &TaskRunId,
    ) -> MappingStoreResult<Option<TaskRunMapping>> {
        let state = self.state.read().map_err(lock_error)?;
        let mapping = state
            .run_index
            .get(task_run_id)
            .and_then(|mapping_id| state.mappings.get(mapping_id))
            .cloned();
        Ok(mapping)
    }

    async fn find_active_by_issue(
        &self,
        issue_id: &IssueId,
    ) -> MappingStoreResult<Option<TaskRunMapping>> {
        let state = self.state.read().map_err(lock_error)?;
        let mapping = state
            .active_issue_index
            .get(issue_id)
            .and_then(|mapping_id| state.mappings.get(mapping_id))
            .cloned();
        Ok(mapping)
    }
}
