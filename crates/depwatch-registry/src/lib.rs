//! Depwatch branch registry.
//!
//! Persistence layer for the branches tracked by the commit monitor. An
//! upstream branch-tracking process creates and updates [`BranchRecord`]s;
//! the checker core only ever reads them.
//!
//! ## Key components
//!
//! - [`BranchRegistry`]: the storage trait consumed by the checker
//! - [`SurrealBranchRegistry`]: SurrealDB-backed implementation
//! - [`fakes::MemoryBranchRegistry`]: in-memory fake for tests

mod error;
pub mod fakes;
mod record;
mod registry;
mod surreal_registry;

pub use error::RegistryError;
pub use record::{BranchId, BranchMode, BranchRecord, CommitRange, RepoRef};
pub use registry::{BranchRegistry, RegistryResult};
pub use surreal_registry::SurrealBranchRegistry;
