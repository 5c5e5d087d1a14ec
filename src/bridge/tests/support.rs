//! Shared fakes and builders for bridge tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::config::domain::{
    AutomationConfig, ProjectId, RemoteProjectId, TrackerStateNames,
};
use crate::mapping::adapters::memory::InMemoryMappingStore;
use crate::mapping::domain::{IssueId, RunStatus, TaskRunId, TaskRunMapping};
use crate::mapping::ports::{MappingStore, MappingStoreResult};
use crate::remote::domain::{QueuedTask, RemoteClientError, RemoteTaskStatus};
use crate::remote::ports::{RemoteClientResult, RemoteTaskClient};
use crate::tracker::adapters::memory::InMemoryIssueTracker;
use crate::tracker::ports::{IssueTracker, TrackerError, TrackerResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

pub const READY: &str = "Ready";
pub const IN_PROGRESS: &str = "In Progress";
pub const IN_REVIEW: &str = "In Review";

pub fn project(id: &str) -> ProjectId {
    ProjectId::new(id).expect("valid project id")
}

pub fn issue(id: &str) -> IssueId {
    IssueId::new(id).expect("valid issue id")
}

pub fn run(id: &str) -> TaskRunId {
    TaskRunId::new(id).expect("valid run id")
}

pub fn config_for(project_id: &str, enabled: bool) -> AutomationConfig {
    AutomationConfig::new(
        project(project_id),
        RemoteProjectId::new("remote-1").expect("valid remote id"),
        enabled,
        TrackerStateNames::new(READY, IN_PROGRESS, IN_REVIEW).expect("valid names"),
    )
}

/// Serializes a lifecycle event envelope the way the remote engine does.
pub fn event_body(
    event_type: &str,
    task_run_id: &str,
    occurred_at: DateTime<Utc>,
    data: Value,
) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "type": event_type,
        "task_run_id": task_run_id,
        "occurred_at": occurred_at.to_rfc3339(),
        "data": data,
    }))
    .expect("envelope serializes")
}

/// Recorded arguments of a queue call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueCall {
    pub remote_project_id: String,
    pub issue_id: String,
    pub title: String,
    pub description: String,
}

/// Remote client replaying scripted responses and recording calls.
///
/// An unscripted call fails loudly so tests also pin down call counts.
#[derive(Debug, Default)]
pub struct FakeRemoteClient {
    queue_script: Mutex<VecDeque<RemoteClientResult<QueuedTask>>>,
    cancel_script: Mutex<VecDeque<RemoteClientResult<RemoteTaskStatus>>>,
    queue_calls: Mutex<Vec<QueueCall>>,
    cancel_calls: Mutex<Vec<String>>,
}

impl FakeRemoteClient {
    /// A client whose next queue call accepts a run with the given id.
    pub fn queueing(run_id: &str) -> Self {
        let client = Self::default();
        client.script_queue(Ok(QueuedTask {
            task_run_id: run(run_id),
            status: RunStatus::Queued,
        }));
        client
    }

    pub fn script_queue(&self, response: RemoteClientResult<QueuedTask>) {
        self.queue_script
            .lock()
            .expect("queue script lock")
            .push_back(response);
    }

    pub fn script_cancel(&self, response: RemoteClientResult<RemoteTaskStatus>) {
        self.cancel_script
            .lock()
            .expect("cancel script lock")
            .push_back(response);
    }

    pub fn queue_calls(&self) -> Vec<QueueCall> {
        self.queue_calls.lock().expect("queue call lock").clone()
    }

    pub fn cancel_calls(&self) -> Vec<String> {
        self.cancel_calls.lock().expect("cancel call lock").clone()
    }
}

#[async_trait]
impl RemoteTaskClient for FakeRemoteClient {
    async fn queue_task(
        &self,
        remote_project_id: &RemoteProjectId,
        issue_id: &IssueId,
        title: &str,
        description: &str,
    ) -> RemoteClientResult<QueuedTask> {
        self.queue_calls
            .lock()
            .expect("queue call lock")
            .push(QueueCall {
                remote_project_id: remote_project_id.as_str().to_owned(),
                issue_id: issue_id.as_str().to_owned(),
                title: title.to_owned(),
                description: description.to_owned(),
            });
        self.queue_script
            .lock()
            .expect("queue script lock")
            .pop_front()
            .unwrap_or(Err(RemoteClientError::Protocol(
                "unscripted queue call".to_owned(),
            )))
    }

    async fn get_task_status(
        &self,
        _task_run_id: &TaskRunId,
    ) -> RemoteClientResult<RemoteTaskStatus> {
        Err(RemoteClientError::Protocol(
            "unscripted status call".to_owned(),
        ))
    }

    async fn cancel_task(&self, task_run_id: &TaskRunId) -> RemoteClientResult<RemoteTaskStatus> {
        self.cancel_calls
            .lock()
            .expect("cancel call lock")
            .push(task_run_id.as_str().to_owned());
        self.cancel_script
            .lock()
            .expect("cancel script lock")
            .pop_front()
            .unwrap_or(Ok(RemoteTaskStatus {
                task_run_id: task_run_id.clone(),
                status: RunStatus::Cancelled,
            }))
    }

    async fn get_task_logs(&self, _task_run_id: &TaskRunId) -> RemoteClientResult<Vec<String>> {
        Err(RemoteClientError::Protocol(
            "unscripted logs call".to_owned(),
        ))
    }
}

/// Tracker failing a scripted number of writes before recovering.
#[derive(Debug, Default)]
pub struct FlakyTracker {
    inner: InMemoryIssueTracker,
    failures_left: Mutex<u32>,
}

impl FlakyTracker {
    /// A tracker whose next write fails, then recovers.
    pub fn failing_once() -> Self {
        Self {
            inner: InMemoryIssueTracker::new(),
            failures_left: Mutex::new(1),
        }
    }

    pub fn inner(&self) -> &InMemoryIssueTracker {
        &self.inner
    }

    fn take_failure(&self) -> TrackerResult<()> {
        let mut failures = self.failures_left.lock().expect("failure budget lock");
        if *failures > 0 {
            *failures -= 1;
            return Err(TrackerError::persistence(std::io::Error::other(
                "tracker outage",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl IssueTracker for FlakyTracker {
    async fn set_state(&self, issue_id: &IssueId, state_name: &str) -> TrackerResult<()> {
        self.take_failure()?;
        self.inner.set_state(issue_id, state_name).await
    }

    async fn append_note(&self, issue_id: &IssueId, note: &str) -> TrackerResult<()> {
        self.take_failure()?;
        self.inner.append_note(issue_id, note).await
    }
}

/// Mapping store counting every port call, for rejection-path assertions.
#[derive(Debug, Default)]
pub struct CountingMappingStore {
    inner: InMemoryMappingStore,
    calls: AtomicUsize,
}

impl CountingMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MappingStore for CountingMappingStore {
    async fn create_active(&self, mapping: &TaskRunMapping) -> MappingStoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_active(mapping).await
    }

    async fn update(&self, mapping: &TaskRunMapping) -> MappingStoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update(mapping).await
    }

    async fn find_by_task_run(
        &self,
        task_run_id: &TaskRunId,
    ) -> MappingStoreResult<Option<TaskRunMapping>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_task_run(task_run_id).await
    }

    async fn find_active_by_issue(
        &self,
        issue_id: &IssueId,
    ) -> MappingStoreResult<Option<TaskRunMapping>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_active_by_issue(issue_id).await
    }
}
