//! Taskbridge: bidirectional synchronization between an issue tracker and a
//! remote task-automation engine.
//!
//! The outbound path queues a remote run exactly once when a tracked issue
//! transitions into its configured ready state; the inbound path applies
//! signed lifecycle webhooks back onto the issue, idempotently and in
//! timestamp order. Everything around that core (admin screens, CLI setup,
//! schema migrations, UI widgets) is an external collaborator: the crate
//! only needs stores for two entities, a tracker write-back port, and an
//! HTTP client to the remote API.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`config`]: Per-project automation settings and the state mapper
//! - [`mapping`]: Issue-to-remote-run association records
//! - [`remote`]: Client to the remote automation API with retry policy
//! - [`tracker`]: Write-back port to the host issue tracker
//! - [`bridge`]: The outbound and inbound orchestration services

pub mod bridge;
pub mod config;
pub mod mapping;
pub mod remote;
pub mod tracker;
