//! Port contracts for automation-config access.

mod store;

pub use store::{ConfigStore, ConfigStoreError, ConfigStoreResult};
