//! Review-service collaborator traits.
//!
//! The hosted review service owns issues (pull requests), their comments,
//! and their labels. Calls are scoped to an explicitly opened session: the
//! dispatcher opens one per repository, performs its calls, and closes it on
//! every exit path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A comment on an issue, as stored by the review service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Service-assigned identity, needed for deletion
    pub id: u64,
    /// Comment text
    pub body: String,
}

/// Hosted review service (issues, comments, labels).
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Open a session scoped to a repository (fully-qualified name).
    async fn open_session(&self, repo: &str) -> Result<Box<dyn ReviewSession>>;
}

/// An open, repository-scoped review-service session.
///
/// Guarantees:
/// - `add_labels` is additive and idempotent: re-adding a present label is a
///   no-op with no error and no duplicate.
/// - `delete_comment` on an unknown id is an error (the comment list moved
///   under us).
#[async_trait]
pub trait ReviewSession: Send + Sync {
    /// All comments on an issue, oldest first.
    async fn list_comments(&self, issue: u64) -> Result<Vec<Comment>>;

    /// Create a comment and return it (with its assigned id).
    async fn create_comment(&self, issue: u64, body: &str) -> Result<Comment>;

    /// Delete a comment by id.
    async fn delete_comment(&self, comment_id: u64) -> Result<()>;

    /// Add labels to an issue.
    async fn add_labels(&self, issue: u64, labels: &[&str]) -> Result<()>;

    /// Release the session.
    async fn close(self: Box<Self>) -> Result<()>;
}
