//! Port contracts for mapping persistence.

mod repository;

pub use repository::{MappingStore, MappingStoreError, MappingStoreResult};
