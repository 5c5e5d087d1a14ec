//! Adapter implementations for mapping ports.

pub mod memory;
pub mod postgres;
