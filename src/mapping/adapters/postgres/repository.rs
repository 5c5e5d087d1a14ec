//! `PostgreSQL` mapping store implementation.

use super::{
    models::{MappingRow, NewMappingRow},
    schema::task_run_mappings,
};
use crate::config::domain::ProjectId;
use crate::mapping::{
    domain::{IssueId, MappingId, PersistedMappingData, RunStatus, TaskRunId, TaskRunMapping},
    ports::{MappingStore, MappingStoreError, MappingStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by mapping adapters.
pub type MappingPgPool = Pool<ConnectionManager<PgConnection>>;

/// Status values counted as active by the partial unique index.
const ACTIVE_STATUSES: [&str; 2] = ["queued", "running"];

/// `PostgreSQL`-backed mapping store.
#[derive(Debug, Clone)]
pub struct PostgresMappingStore {
    pool: MappingPgPool,
}

impl PostgresMappingStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MappingPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> MappingStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> MappingStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(MappingStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(MappingStoreError::persistence)?
    }
}

#[async_trait]
impl MappingStore for PostgresMappingStore {
    async fn create_active(&self, mapping: &TaskRunMapping) -> MappingStoreResult<()> {
        let issue_id = mapping.issue_id().clone();
        let task_run_id = mapping.task_run_id().clone();
        let new_row = to_new_row(mapping);

        self.run_blocking(move |connection| {
            // No pre-check: the partial unique index is the arbiter, so two
            // racing inserts resolve to exactly one stored row.
            diesel::insert_into(task_run_mappings::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_active_issue_unique_violation(info.as_ref()) =>
                    {
                        MappingStoreError::ActiveMappingExists(issue_id.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        MappingStoreError::DuplicateTaskRun(task_run_id.clone())
                    }
                    _ => MappingStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, mapping: &TaskRunMapping) -> MappingStoreResult<()> {
        let mapping_id = mapping.id();
        let status = mapping.status().as_str().to_owned();
        let pr_url = mapping.pr_url().map(str::to_owned);
        let last_event_at = mapping.last_event_at();

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                task_run_mappings::table.filter(task_run_mappings::id.eq(mapping_id.into_inner())),
            )
            .set((
                task_run_mappings::status.eq(status),
                task_run_mappings::pr_url.eq(pr_url),
                task_run_mappings::last_event_at.eq(last_event_at),
            ))
            .execute(connection)
            .map_err(MappingStoreError::persistence)?;

            if updated == 0 {
                return Err(MappingStoreError::NotFound(mapping_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_task_run(
        &self,
        task_run_id: &TaskRunId,
    ) -> MappingStoreResult<Option<TaskRunMapping>> {
        let lookup_run_id = task_run_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = task_run_mappings::table
                .filter(task_run_mappings::task_run_id.eq(lookup_run_id))
                .select(MappingRow::as_select())
                .first::<MappingRow>(connection)
                .optional()
                .map_err(MappingStoreError::persistence)?;
            row.map(row_to_mapping).transpose()
        })
        .await
    }

    async fn find_active_by_issue(
        &self,
        issue_id: &IssueId,
    ) -> MappingStoreResult<Option<TaskRunMapping>> {
        let lookup_issue_id = issue_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = task_run_mappings::table
                .filter(task_run_mappings::issue_id.eq(lookup_issue_id))
                .filter(task_run_mappings::status.eq_any(ACTIVE_STATUSES))
                .select(MappingRow::as_select())
                .first::<MappingRow>(connection)
                .optional()
                .map_err(MappingStoreError::persistence)?;
            row.map(row_to_mapping).transpose()
        })
        .await
    }
}

fn to_new_row(mapping: &TaskRunMapping) -> NewMappingRow {
    NewMappingRow {
        id: mapping.id().into_inner(),
        issue_id: mapping.issue_id().as_str().to_owned(),
        project_id: mapping.project_id().as_str().to_owned(),
        task_run_id: mapping.task_run_id().as_str().to_owned(),
        status: mapping.status().as_str().to_owned(),
        pr_url: mapping.pr_url().map(str::to_owned),
        last_event_at: mapping.last_event_at(),
        created_at: mapping.created_at(),
    }
}

fn row_to_mapping(row: MappingRow) -> MappingStoreResult<TaskRunMapping> {
    let MappingRow {
        id,
        issue_id,
        project_id,
        task_run_id,
        status: persisted_status,
        pr_url,
        last_event_at,
        created_at,
    } = row;

    let status =
        RunStatus::try_from(persisted_status.as_str()).map_err(MappingStoreError::persistence)?;

    let data = PersistedMappingData {
        id: MappingId::from_uuid(id),
        issue_id: IssueId::new(issue_id).map_err(MappingStoreError::persistence)?,
        project_id: ProjectId::new(project_id).map_err(MappingStoreError::persistence)?,
        task_run_id: TaskRunId::new(task_run_id).map_err(MappingStoreError::persistence)?,
        status,
        pr_url,
        last_event_at,
        created_at,
    };
    Ok(TaskRunMapping::from_persisted(data))
}

fn is_active_issue_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_task_run_mappings_issue_active_unique")
}

#[cfg(test)]
mod tests {
    use super::{row_to_mapping, to_new_row};
    use crate::config::domain::ProjectId;
    use crate::mapping::domain::{IssueId, RunStatus, TaskRunId, TaskRunMapping};
    use mockable::DefaultClock;

    fn sample_mapping() -> TaskRunMapping {
        TaskRunMapping::new_queued(
            IssueId::new("ISSUE-7").expect("valid issue id"),
            ProjectId::new("PROJ").expect("valid project id"),
            TaskRunId::new("run-123").expect("valid run id"),
            &DefaultClock,
        )
    }

    #[test]
    fn row_round_trips_through_conversion() {
        let mapping = sample_mapping();
        let new_row = to_new_row(&mapping);

        let row = super::MappingRow {
            id: new_row.id,
            issue_id: new_row.issue_id,
            project_id: new_row.project_id,
            task_run_id: new_row.task_run_id,
            status: new_row.status,
            pr_url: new_row.pr_url,
            last_event_at: new_row.last_event_at,
            created_at: new_row.created_at,
        };
        let restored = row_to_mapping(row).expect("conversion should succeed");

        assert_eq!(restored, mapping);
    }

    #[test]
    fn unknown_status_is_a_persistence_error() {
        let mapping = sample_mapping();
        let mut new_row = to_new_row(&mapping);
        new_row.status = "sideways".to_owned();

        let row = super::MappingRow {
            id: new_row.id,
            issue_id: new_row.issue_id,
            project_id: new_row.project_id,
            task_run_id: new_row.task_run_id,
            status: new_row.status,
            pr_url: new_row.pr_url,
            last_event_at: new_row.last_event_at,
            created_at: new_row.created_at,
        };

        assert!(row_to_mapping(row).is_err());
    }

    #[test]
    fn active_statuses_match_non_terminal_domain_statuses() {
        for status in [
            RunStatus::Queued,
            RunStatus::Running,
            RunStatus::Success,
            RunStatus::Failed,
            RunStatus::Cancelled,
        ] {
            let indexed = super::ACTIVE_STATUSES.contains(&status.as_str());
            assert_eq!(indexed, !status.is_terminal());
        }
    }
}
