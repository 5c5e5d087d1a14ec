//! Tests for the outbound transition watcher.

use std::sync::Arc;

use crate::bridge::domain::StateChange;
use crate::bridge::services::{
    SkipReason, TransitionWatcher, TriggerDecision, TriggerError, TriggerOutcome,
};
use crate::bridge::tests::support::{
    config_for, issue, project, run, FakeRemoteClient, IN_PROGRESS, READY,
};
use crate::config::adapters::memory::InMemoryConfigStore;
use crate::mapping::adapters::memory::InMemoryMappingStore;
use crate::mapping::domain::{RunStatus, TaskRunMapping};
use crate::mapping::ports::MappingStore;
use crate::remote::domain::RemoteClientError;
use crate::tracker::adapters::memory::InMemoryIssueTracker;
use mockable::DefaultClock;
use rstest::rstest;

type Watcher = TransitionWatcher<
    InMemoryConfigStore,
    InMemoryMappingStore,
    FakeRemoteClient,
    InMemoryIssueTracker,
    DefaultClock,
>;

struct Env {
    configs: Arc<InMemoryConfigStore>,
    mappings: Arc<InMemoryMappingStore>,
    remote: Arc<FakeRemoteClient>,
    tracker: Arc<InMemoryIssueTracker>,
}

impl Env {
    fn new(remote: FakeRemoteClient) -> Self {
        let env = Self {
            configs: Arc::new(InMemoryConfigStore::new()),
            mappings: Arc::new(InMemoryMappingStore::new()),
            remote: Arc::new(remote),
            tracker: Arc::new(InMemoryIssueTracker::new()),
        };
        env.configs
            .insert(config_for("PROJ", true))
            .expect("seeding should succeed");
        env
    }

    fn watcher(&self) -> Watcher {
        TransitionWatcher::new(
            Arc::clone(&self.configs),
            Arc::clone(&self.mappings),
            Arc::clone(&self.remote),
            Arc::clone(&self.tracker),
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

fn ready_change() -> StateChange {
    StateChange::new(
        issue("ISSUE-1"),
        project("PROJ"),
        "Todo",
        READY,
        "Fix login",
        "Steps to reproduce",
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn ready_transition_queues_run_and_moves_issue_in_progress() {
    let env = Env::new(FakeRemoteClient::queueing("run-1"));

    let outcome = env
        .watcher()
        .handle(&ready_change())
        .await
        .expect("trigger should succeed");

    let TriggerOutcome::Queued(mapping) = outcome else {
        panic!("expected a queued outcome, got {outcome:?}");
    };
    assert_eq!(mapping.issue_id(), &issue("ISSUE-1"));
    assert_eq!(mapping.task_run_id(), &run("run-1"));
    assert_eq!(mapping.status(), RunStatus::Queued);

    let calls = env.remote.queue_calls();
    assert_eq!(calls.len(), 1);
    let call = calls.first().expect("one queue call");
    assert_eq!(call.remote_project_id, "remote-1");
    assert_eq!(call.issue_id, "ISSUE-1");
    assert_eq!(call.title, "Fix login");
    assert_eq!(call.description, "Steps to reproduce");

    assert_eq!(
        env.tracker.current_state(&issue("ISSUE-1")),
        Some(IN_PROGRESS.to_owned())
    );
    let stored = env
        .mappings
        .find_active_by_issue(&issue("ISSUE-1"))
        .await
        .expect("lookup should succeed");
    assert_eq!(stored, Some(mapping));
}

#[tokio::test(flavor = "multi_thread")]
async fn unconfigured_project_is_skipped() {
    let env = Env::new(FakeRemoteClient::default());
    let change = StateChange::new(
        issue("ISSUE-1"),
        project("OTHER"),
        "Todo",
        READY,
        "t",
        "d",
    );

    let outcome = env
        .watcher()
        .handle(&change)
        .await
        .expect("handling should succeed");
    assert_eq!(outcome, TriggerOutcome::Skipped(SkipReason::ConfigMissing));
    assert!(env.remote.queue_calls().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn disabled_automation_is_skipped() {
    let env = Env::new(FakeRemoteClient::default());
    env.configs
        .insert(config_for("PROJ", false))
        .expect("seeding should succeed");

    let outcome = env
        .watcher()
        .handle(&ready_change())
        .await
        .expect("handling should succeed");
    assert_eq!(
        outcome,
        TriggerOutcome::Skipped(SkipReason::AutomationDisabled)
    );
}

#[rstest]
#[case("Todo", "In Progress", SkipReason::NotReadyState)]
#[case(READY, READY, SkipReason::NoOpResave)]
#[tokio::test(flavor = "multi_thread")]
async fn ineligible_state_changes_are_skipped(
    #[case] previous: &str,
    #[case] new: &str,
    #[case] expected: SkipReason,
) {
    let env = Env::new(FakeRemoteClient::default());
    let change = StateChange::new(issue("ISSUE-1"), project("PROJ"), previous, new, "t", "d");

    let outcome = env
        .watcher()
        .handle(&change)
        .await
        .expect("handling should succeed");
    assert_eq!(outcome, TriggerOutcome::Skipped(expected));
    assert!(env.remote.queue_calls().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn issue_with_active_run_is_skipped() {
    let env = Env::new(FakeRemoteClient::default());
    env.seed_active_mapping("run-existing").await;

    let outcome = env
        .watcher()
        .handle(&ready_change())
        .await
        .expect("handling should succeed");
    assert_eq!(
        outcome,
        TriggerOutcome::Skipped(SkipReason::MappingAlreadyActive)
    );
    assert!(env.remote.queue_calls().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn remote_failure_leaves_no_local_trace() {
    let env = Env::new(FakeRemoteClient::default());
    env.remote
        .script_queue(Err(RemoteClientError::Server { status: 503 }));

    let result = env.watcher().handle(&ready_change()).await;
    assert!(matches!(result, Err(TriggerError::Remote(_))));

    let active = env
        .mappings
        .find_active_by_issue(&issue("ISSUE-1"))
        .await
        .expect("lookup should succeed");
    assert!(active.is_none(), "no mapping may exist after remote failure");
    assert!(env.tracker.state_history(&issue("ISSUE-1")).is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn mapping_write_failure_after_remote_acceptance_is_surfaced() {
    let env = Env::new(FakeRemoteClient::queueing("run-1"));
    let watcher = env.watcher();

    let decision = watcher
        .evaluate(&ready_change())
        .await
        .expect("evaluation should succeed");
    let TriggerDecision::Fire(action) = decision else {
        panic!("expected an eligible transition, got {decision:?}");
    };

    // Another run wins the race between evaluation and firing.
    env.seed_active_mapping("run-racer").await;

    let result = watcher.fire(action).await;
    match result {
        Err(TriggerError::Inconsistency { task_run_id, .. }) => {
            assert_eq!(task_run_id, run("run-1"));
        }
        other => panic!("expected an inconsistency error, got {other:?}"),
    }
    assert!(
        env.tracker.state_history(&issue("ISSUE-1")).is_empty(),
        "tracker is untouched when the mapping write fails"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_triggers_queue_at_most_one_run() {
    let env = Env::new(FakeRemoteClient::queueing("run-a"));
    env.remote.script_queue(Ok(crate::remote::domain::QueuedTask {
        task_run_id: run("run-b"),
        status: RunStatus::Queued,
    }));

    let watcher_a = env.watcher();
    let watcher_b = env.watcher();
    let change = ready_change();
    let change_b = change.clone();

    let (result_a, result_b) = tokio::join!(
        tokio::spawn(async move { watcher_a.handle(&change).await }),
        tokio::spawn(async move { watcher_b.handle(&change_b).await }),
    );
    let outcomes = [
        result_a.expect("task should not panic"),
        result_b.expect("task should not panic"),
    ];

    let queued = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Ok(TriggerOutcome::Queued(_))))
        .count();
    assert_eq!(queued, 1, "exactly one trigger may queue a run");
    for outcome in &outcomes {
        assert!(
            matches!(
                outcome,
                Ok(TriggerOutcome::Queued(_)
                    | TriggerOutcome::Skipped(SkipReason::MappingAlreadyActive))
                    | Err(TriggerError::Inconsistency { .. })
            ),
            "unexpected outcome: {outcome:?}"
        );
    }

    let active = env
        .mappings
        .find_active_by_issue(&issue("ISSUE-1"))
        .await
        .expect("lookup should succeed");
    assert!(active.is_some(), "the winning run has an active mapping");
}
