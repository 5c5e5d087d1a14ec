//! `PostgreSQL` adapter for mapping persistence.
//!
//! The single-active-mapping-per-issue invariant is enforced by the
//! database, not by this adapter: the schema carries a partial unique index
//!
//! ```sql
//! CREATE UNIQUE INDEX idx_task_run_mappings_issue_active_unique
//!     ON task_run_mappings (issue_id)
//!     WHERE status IN ('queued', 'running');
//! ```
//!
//! plus a plain unique index `idx_task_run_mappings_run_unique` on
//! `task_run_id`. Schema migrations are the host system's concern; the
//! adapter only maps violations of those named constraints back to typed
//! store errors.

mod models;
mod repository;
mod schema;

pub use repository::{MappingPgPool, PostgresMappingStore};
