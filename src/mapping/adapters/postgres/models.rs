//! Diesel row models for mapping persistence.

use super::schema::task_run_mappings;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for mapping records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_run_mappings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MappingRow {
    /// Internal mapping identifier.
    pub id: uuid::Uuid,
    /// Tracker issue identifier.
    pub issue_id: String,
    /// Tracker project identifier.
    pub project_id: String,
    /// Remote task-run identifier.
    pub task_run_id: String,
    /// Canonical run status.
    pub status: String,
    /// Pull-request URL attached by inbound events.
    pub pr_url: Option<String>,
    /// Timestamp of the last applied lifecycle event.
    pub last_event_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for mapping records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_run_mappings)]
pub struct NewMappingRow {
    /// Internal mapping identifier.
    pub id: uuid::Uuid,
    /// Tracker issue identifier.
    pub issue_id: String,
    /// Tracker project identifier.
    pub project_id: String,
    /// Remote task-run identifier.
    pub task_run_id: String,
    /// Canonical run status.
    pub status: String,
    /// Pull-request URL attached by inbound events.
    pub pr_url: Option<String>,
    /// Timestamp of the last applied lifecycle event.
    pub last_event_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
