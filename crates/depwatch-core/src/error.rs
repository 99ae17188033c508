//! Error taxonomy for the checker core.
//!
//! Only collaborator failures are errors. Skips (branch missing, checker not
//! enabled, no relevant change, regular branch) are successful completions
//! reported through [`crate::checker::CheckOutcome`].

use depwatch_registry::RegistryError;

/// Checker errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("git error: {0}")]
    Git(String),

    #[error("review service error: {0}")]
    Review(String),

    #[error("invalid checker config: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for checker operations.
pub type Result<T> = std::result::Result<T, CheckerError>;
