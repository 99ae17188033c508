//! Error types for depwatch-registry

use thiserror::Error;

/// Errors that can occur in the branch registry layer
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Database connection error
    #[error("Registry connection failed: {0}")]
    Connection(String),

    /// Backend query error
    #[error("Registry backend error: {0}")]
    Backend(String),

    /// Serialization error
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Branch not found (mutating operations only; lookups return `Ok(None)`)
    #[error("Branch not found: {branch_id}")]
    BranchNotFound { branch_id: String },
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}
