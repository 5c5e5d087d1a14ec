//! Outbound port to the host issue tracker.
//!
//! The tracker itself is an external collaborator; the core only needs to
//! move an issue to a named state and append notes. The in-memory adapter
//! records both for assertions in tests.

pub mod adapters;
pub mod ports;
