//! Bidirectional synchronization between the tracker and the remote engine.
//!
//! The outbound path watches tracker state changes and queues remote task
//! runs exactly once per issue; the inbound path verifies signed webhook
//! payloads and applies lifecycle events back onto mappings and the
//! tracker, idempotently and in timestamp order. Both paths are independent
//! entry points against shared persistent state; the only hard
//! mutual-exclusion requirement (no double queue) lives in the mapping
//! store's atomic conditional insert, not in this module.
//!
//! - Envelope and callback types in [`domain`]
//! - Webhook signature verification in [`signature`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod services;
pub mod signature;

#[cfg(test)]
mod tests;
