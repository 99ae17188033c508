//! In-memory fake for the branch registry (testing only)

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::RegistryError;
use crate::record::{BranchId, BranchRecord};
use crate::registry::{BranchRegistry, RegistryResult};

/// In-memory branch registry backed by a `HashMap<branch_id, record>`.
#[derive(Debug, Default)]
pub struct MemoryBranchRegistry {
    branches: Mutex<HashMap<String, BranchRecord>>,
}

impl MemoryBranchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor seeding the registry with records.
    pub fn with_branches(records: impl IntoIterator<Item = BranchRecord>) -> Self {
        let registry = Self::new();
        {
            let mut branches = registry.branches.lock().unwrap();
            for record in records {
                branches.insert(record.branch_id.0.clone(), record);
            }
        }
        registry
    }
}

#[async_trait]
impl BranchRegistry for MemoryBranchRegistry {
    async fn find_branch(&self, id: &BranchId) -> RegistryResult<Option<BranchRecord>> {
        let branches = self.branches.lock().unwrap();
        Ok(branches.get(&id.0).cloned())
    }

    async fn upsert_branch(&self, record: BranchRecord) -> RegistryResult<()> {
        let mut branches = self.branches.lock().unwrap();
        branches.insert(record.branch_id.0.clone(), record);
        Ok(())
    }

    async fn delete_branch(&self, id: &BranchId) -> RegistryResult<()> {
        let mut branches = self.branches.lock().unwrap();
        branches
            .remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| RegistryError::BranchNotFound {
                branch_id: id.0.clone(),
            })
    }

    async fn list_branches(&self) -> RegistryResult<Vec<BranchRecord>> {
        let branches = self.branches.lock().unwrap();
        Ok(branches.values().cloned().collect())
    }
}
