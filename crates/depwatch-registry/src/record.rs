//! Branch records tracked by the commit monitor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque branch identifier assigned by the branch-tracking process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchId(pub String);

impl BranchId {
    pub fn new(id: impl Into<String>) -> Self {
        BranchId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to the repository a branch belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Fully-qualified name (e.g. "stevedores-org/depwatch")
    pub fq_name: String,
    /// Local clone path used for diff inspection
    pub path: String,
}

/// An inclusive span of commits, oldest endpoint first.
///
/// Degenerate single-commit ranges have `first == last`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRange {
    pub first: String,
    pub last: String,
}

impl CommitRange {
    /// Whether the range spans exactly one commit.
    pub fn is_single(&self) -> bool {
        self.first == self.last
    }
}

/// Branch mode, derived from the presence of a pull-request number.
///
/// Dispatch on this enum is exhaustive; the `Regular` arm is a deliberate
/// no-op in the checker (no notification channel exists for plain branches
/// yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchMode {
    PullRequest { number: u64 },
    Regular,
}

/// A branch tracked by the commit monitor.
///
/// Created and updated by the upstream branch tracker; read-only from the
/// checker's perspective. `pr_number` is `Some` if and only if the branch is
/// a pull-request branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Registry-assigned identifier
    pub branch_id: BranchId,
    /// Branch name (e.g. "pr/1234", "master")
    pub name: String,
    /// Owning repository
    pub repo: RepoRef,
    /// Checker keys this branch is enabled for
    pub enabled_checkers: Vec<String>,
    /// Pull-request number, when the branch backs a PR
    pub pr_number: Option<u64>,
    /// Commit identifiers in the pushed range, oldest first
    pub commits: Vec<String>,
    /// URI template for linking to a commit; `{sha}` is substituted
    pub commit_uri_template: String,
    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl BranchRecord {
    /// Whether the given checker is enabled for this branch.
    pub fn enabled_for(&self, checker_key: &str) -> bool {
        self.enabled_checkers.iter().any(|c| c == checker_key)
    }

    /// Branch mode derived from the pull-request number.
    pub fn mode(&self) -> BranchMode {
        match self.pr_number {
            Some(number) => BranchMode::PullRequest { number },
            None => BranchMode::Regular,
        }
    }

    /// The commit range delimited by the oldest and newest tracked commits.
    ///
    /// `None` when the branch has no commits recorded.
    pub fn commit_range(&self) -> Option<CommitRange> {
        let first = self.commits.first()?;
        let last = self.commits.last()?;
        Some(CommitRange {
            first: first.clone(),
            last: last.clone(),
        })
    }

    /// Human-facing URI for a commit on this branch's repository.
    pub fn commit_uri(&self, sha: &str) -> String {
        self.commit_uri_template.replace("{sha}", sha)
    }
}
