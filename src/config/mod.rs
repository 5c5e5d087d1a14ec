//! Per-project automation settings for the tracker bridge.
//!
//! This context owns the read-only configuration surface the core consumes:
//! which projects have automation enabled, which remote project they map to,
//! and the tracker state names that drive triggering and status write-back.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//!
//! Administrative creation and editing of configs is the host system's
//! concern; the core only reads them.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
