//! Branch registry trait definition.
//!
//! The registry is the source of truth for which branches the commit monitor
//! tracks. The checker core only calls `find_branch`; the mutating methods
//! exist for the upstream branch tracker and for test setup.

use async_trait::async_trait;

use crate::error::RegistryError;
use crate::record::{BranchId, BranchRecord};

/// Result type for registry operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Branch registry storage.
///
/// Guarantees:
/// - `find_branch` returns `Ok(None)` for unknown ids (absence is not an
///   error; a branch may be deleted between job enqueue and job run).
/// - `upsert_branch` replaces any existing record with the same id.
/// - `delete_branch` fails with `BranchNotFound` for unknown ids.
#[async_trait]
pub trait BranchRegistry: Send + Sync {
    /// Look up a branch by id.
    async fn find_branch(&self, id: &BranchId) -> RegistryResult<Option<BranchRecord>>;

    /// Create or replace a branch record.
    async fn upsert_branch(&self, record: BranchRecord) -> RegistryResult<()>;

    /// Remove a branch record.
    async fn delete_branch(&self, id: &BranchId) -> RegistryResult<()>;

    /// List all tracked branches.
    async fn list_branches(&self) -> RegistryResult<Vec<BranchRecord>>;
}
