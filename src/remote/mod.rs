//! Client to the remote task-automation API.
//!
//! The port in [`ports`] exposes the four operations the bridge consumes:
//! queue, status, cancel, and logs. Errors carry a typed taxonomy so the
//! retry decorator in [`adapters::retry`] can tell transient conditions
//! (rate limits, server errors, network faults) from permanent ones. The
//! HTTP adapter in [`adapters::http`] is built once per process from
//! injected configuration; there is no process-wide client state.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
