//! Adapter implementations for the remote client port.

pub mod http;
pub mod retry;
