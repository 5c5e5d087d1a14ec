//! Adapter implementations for config ports.

pub mod memory;
