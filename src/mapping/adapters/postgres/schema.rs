//! Diesel schema for mapping persistence.

diesel::table! {
    /// Issue-to-remote-task-run mapping records.
    task_run_mappings (id) {
        /// Internal mapping identifier.
        id -> Uuid,
        /// Tracker issue identifier.
        #[max_length = 255]
        issue_id -> Varchar,
        /// Tracker project identifier.
        #[max_length = 255]
        project_id -> Varchar,
        /// Remote task-run identifier.
        #[max_length = 255]
        task_run_id -> Varchar,
        /// Canonical run status.
        #[max_length = 50]
        status -> Varchar,
        /// Pull-request URL attached by inbound events.
        #[max_length = 2048]
        pr_url -> Nullable<Varchar>,
        /// Timestamp of the last applied lifecycle event.
        last_event_at -> Timestamptz,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
