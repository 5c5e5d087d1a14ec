//! Issue-to-remote-task-run association records.
//!
//! A [`domain::TaskRunMapping`] ties a tracker issue to a queued run in the
//! remote automation engine and carries the canonical status the inbound
//! event path mutates. The store port enforces the anti-double-queue
//! invariant: at most one mapping per issue may be in a non-terminal status,
//! guaranteed by an atomic conditional insert rather than a check-then-act
//! sequence. Mappings are never deleted; terminal rows remain as history.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
