//! HTTP adapter for the remote automation API, backed by `reqwest`.

use crate::config::domain::RemoteProjectId;
use crate::mapping::domain::{IssueId, RunStatus, TaskRunId};
use crate::remote::domain::{QueuedTask, RemoteClientError, RemoteTaskStatus};
use crate::remote::ports::{RemoteClientResult, RemoteTaskClient};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Connection settings for the remote automation API.
///
/// Constructed once per process from the host's configuration and treated
/// as immutable; the resulting client is shared read-only.
#[derive(Debug, Clone)]
pub struct RemoteApiConfig {
    /// Base URL of the remote API, without a trailing slash.
    pub base_url: String,
    /// Bearer credential sent with every request.
    pub token: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
}

/// Limit on response-body excerpts embedded in validation errors.
const ERROR_BODY_EXCERPT_CHARS: usize = 400;

/// `reqwest`-backed remote client.
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpRemoteClient {
    /// Builds a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteClientError::Network`] when the underlying HTTP
    /// client cannot be constructed.
    pub fn new(config: &RemoteApiConfig) -> RemoteClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| RemoteClientError::Network(err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn execute<T>(&self, request: reqwest::RequestBuilder) -> RemoteClientResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|err| RemoteClientError::Protocol(err.to_string()));
        }

        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), retry_after, &body))
    }
}

#[async_trait]
impl RemoteTaskClient for HttpRemoteClient {
    async fn queue_task(
        &self,
        remote_project_id: &RemoteProjectId,
        issue_id: &IssueId,
        title: &str,
        description: &str,
    ) -> RemoteClientResult<QueuedTask> {
        let payload = json!({
            "project_id": remote_project_id.as_str(),
            "work_item_id": issue_id.as_str(),
            "title": title,
            "description": description,
        });
        let dto: TaskDto = self
            .execute(self.http.post(self.url("/tasks")).json(&payload))
            .await?;
        let (task_run_id, status) = dto.into_domain()?;
        Ok(QueuedTask {
            task_run_id,
            status,
        })
    }

    async fn get_task_status(
        &self,
        task_run_id: &TaskRunId,
    ) -> RemoteClientResult<RemoteTaskStatus> {
        let dto: TaskDto = self
            .execute(self.http.get(self.url(&format!("/tasks/{task_run_id}"))))
            .await?;
        let (run_id, status) = dto.into_domain()?;
        Ok(RemoteTaskStatus {
            task_run_id: run_id,
            status,
        })
    }

    async fn cancel_task(&self, task_run_id: &TaskRunId) -> RemoteClientResult<RemoteTaskStatus> {
        let dto: TaskDto = self
            .execute(
                self.http
                    .post(self.url(&format!("/tasks/{task_run_id}/cancel"))),
            )
            .await?;
        let (run_id, status) = dto.into_domain()?;
        Ok(RemoteTaskStatus {
            task_run_id: run_id,
            status,
        })
    }

    async fn get_task_logs(&self, task_run_id: &TaskRunId) -> RemoteClientResult<Vec<String>> {
        let dto: LogsDto = self
            .execute(
                self.http
                    .get(self.url(&format!("/tasks/{task_run_id}/logs"))),
            )
            .await?;
        Ok(dto.lines)
    }
}

/// Wire shape of task resources (`POST /tasks`, `GET /tasks/{id}`,
/// `POST /tasks/{id}/cancel`).
#[derive(Debug, Deserialize)]
struct TaskDto {
    id: String,
    status: String,
}

impl TaskDto {
    fn into_domain(self) -> RemoteClientResult<(TaskRunId, RunStatus)> {
        let task_run_id = TaskRunId::new(self.id)
            .map_err(|err| RemoteClientError::Protocol(err.to_string()))?;
        let status = RunStatus::try_from(self.status.as_str())
            .map_err(|err| RemoteClientError::Protocol(err.to_string()))?;
        Ok((task_run_id, status))
    }
}

/// Wire shape of `GET /tasks/{id}/logs`.
#[derive(Debug, Deserialize)]
struct LogsDto {
    lines: Vec<String>,
}

fn classify_transport_error(err: reqwest::Error) -> RemoteClientError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        return RemoteClientError::Network(err.to_string());
    }
    RemoteClientError::Protocol(err.to_string())
}

fn classify_status(
    status: u16,
    retry_after: Option<Duration>,
    body: &str,
) -> RemoteClientError {
    match status {
        401 | 403 => RemoteClientError::Auth { status },
        404 => RemoteClientError::NotFound,
        400 | 422 => RemoteClientError::Validation {
            status,
            message: excerpt(body),
        },
        429 => RemoteClientError::RateLimited { retry_after },
        500..=599 => RemoteClientError::Server { status },
        _ => RemoteClientError::Protocol(format!("unexpected status {status}: {}", excerpt(body))),
    }
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    let raw = headers.get(reqwest::header::RETRY_AFTER)?.to_str().ok()?;
    let seconds = raw.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(seconds))
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= ERROR_BODY_EXCERPT_CHARS {
        return text.to_owned();
    }
    let mut truncated = text
        .chars()
        .take(ERROR_BODY_EXCERPT_CHARS)
        .collect::<String>();
    truncated.push_str("...");
    truncated
}
