//! Tests for user-initiated run cancellation.

use std::sync::Arc;

use crate::bridge::services::{CancelError, CancelService};
use crate::bridge::tests::support::{issue, project, run, FakeRemoteClient};
use crate::mapping::adapters::memory::InMemoryMappingStore;
use crate::mapping::domain::{RunStatus, TaskRunMapping};
use crate::mapping::ports::MappingStore;
use crate::remote::domain::RemoteClientError;
use chrono::{Duration, Utc};
use mockable::DefaultClock;

type Service = CancelService<InMemoryMappingStore, FakeRemoteClient, DefaultClock>;

struct Env {
    mappings: Arc<InMemoryMappingStore>,
    remote: Arc<FakeRemoteClient>,
}

impl Env {
    fn new() -> Self {
        Self {
            mappings: Arc::new(InMemoryMappingStore::new()),
            remote: Arc::new(FakeRemoteClient::default()),
        }
    }

    fn service(&self) -> Service {
        CancelService::new(
            Arc::clone(&self.mappings),
            Arc::clone(&self.remote),
            Arc::new(DefaultClock),
        )
    }

    async fn seed_active_mapping(&self, run_id: &str) -> TaskRunMapping {
        let mapping = TaskRunMapping::new_queued(
            issue("ISSUE-1"),
            project("PROJ"),
            run(run_id),
            &DefaultClock,
        );
        self.mappings
            .create_active(&mapping)
            .await
            .expect("seeding should succeed");
        mapping
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelling_an_active_run_moves_it_to_cancelled() {
    let env = Env::new();
    env.seed_active_mapping("run-1").await;

    let cancelled = env
        .service()
        .cancel(&issue("ISSUE-1"))
        .await
        .expect("cancellation should succeed");
    assert_eq!(cancelled.status(), RunStatus::Cancelled);
    assert_eq!(env.remote.cancel_calls(), vec!["run-1".to_owned()]);

    let stored = env
        .mappings
        .find_by_task_run(&run("run-1"))
        .await
        .expect("lookup should succeed")
        .expect("mapping should exist");
    assert_eq!(stored.status(), RunStatus::Cancelled);

    // The active slot is free again.
    let active = env
        .mappings
        .find_active_by_issue(&issue("ISSUE-1"))
        .await
        .expect("lookup should succeed");
    assert!(active.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelling_without_an_active_run_is_an_error() {
    let env = Env::new();
    let result = env.service().cancel(&issue("ISSUE-1")).await;
    assert!(matches!(result, Err(CancelError::NoActiveRun(_))));
    assert!(env.remote.cancel_calls().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn remote_rejection_leaves_the_mapping_active() {
    let env = Env::new();
    env.seed_active_mapping("run-1").await;
    env.remote
        .script_cancel(Err(RemoteClientError::Server { status: 500 }));

    let result = env.service().cancel(&issue("ISSUE-1")).await;
    assert!(matches!(result, Err(CancelError::Remote(_))));

    let active = env
        .mappings
        .find_active_by_issue(&issue("ISSUE-1"))
        .await
        .expect("lookup should succeed");
    assert_eq!(active.map(|m| m.status()), Some(RunStatus::Queued));
}

#[tokio::test(flavor = "multi_thread")]
async fn newer_lifecycle_event_supersedes_the_cancellation() {
    let env = Env::new();
    let mut mapping = env.seed_active_mapping("run-1").await;

    // A start event stamped ahead of the cancellation acknowledgment has
    // already been applied; the ordering rule says it wins.
    let ahead = Utc::now() + Duration::hours(1);
    assert!(mapping.apply_status(RunStatus::Running, ahead));
    env.mappings
        .update(&mapping)
        .await
        .expect("update should succeed");

    let returned = env
        .service()
        .cancel(&issue("ISSUE-1"))
        .await
        .expect("cancellation is acknowledged");
    assert_eq!(env.remote.cancel_calls(), vec!["run-1".to_owned()]);
    assert_eq!(returned.status(), RunStatus::Running);

    let stored = env
        .mappings
        .find_by_task_run(&run("run-1"))
        .await
        .expect("lookup should succeed")
        .expect("mapping should exist");
    assert_eq!(stored.status(), RunStatus::Running);
    assert_eq!(stored.last_event_at(), ahead);
}
