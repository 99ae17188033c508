//! In-memory fakes for the checker's collaborators (testing only)
//!
//! Provides `StaticDiffService` and `MemoryReviewService` that satisfy the
//! collaborator contracts without any external dependencies, plus enough
//! introspection to assert on side effects and session hygiene.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{CheckerError, Result};
use crate::review::{Comment, ReviewService, ReviewSession};
use crate::DiffService;

// ---------------------------------------------------------------------------
// StaticDiffService
// ---------------------------------------------------------------------------

/// Diff service returning a fixed changed-path set for every range.
#[derive(Debug, Default)]
pub struct StaticDiffService {
    paths: Vec<String>,
    fail: bool,
    calls: AtomicU64,
}

impl StaticDiffService {
    pub fn new(paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        StaticDiffService {
            paths: paths.into_iter().map(Into::into).collect(),
            fail: false,
            calls: AtomicU64::new(0),
        }
    }

    /// A diff service whose every call fails, for collaborator-error tests.
    pub fn failing() -> Self {
        StaticDiffService {
            paths: Vec::new(),
            fail: true,
            calls: AtomicU64::new(0),
        }
    }

    /// How many times `changed_paths` was invoked.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiffService for StaticDiffService {
    async fn changed_paths(
        &self,
        _repo_path: &Path,
        _first: &str,
        _last: &str,
    ) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CheckerError::Git("diff service unavailable".to_string()));
        }
        Ok(self.paths.clone())
    }
}

// ---------------------------------------------------------------------------
// MemoryReviewService
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ReviewState {
    next_comment_id: u64,
    /// issue -> comments, oldest first
    comments: HashMap<u64, Vec<Comment>>,
    /// issue -> labels, no duplicates
    labels: HashMap<u64, Vec<String>>,
    sessions_opened: u64,
    sessions_closed: u64,
}

/// In-memory review service tracking comments, labels, and session lifetimes.
#[derive(Debug, Default)]
pub struct MemoryReviewService {
    state: Arc<Mutex<ReviewState>>,
}

impl MemoryReviewService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an issue with pre-existing comments.
    pub fn seed_comments(&self, issue: u64, bodies: impl IntoIterator<Item = impl Into<String>>) {
        let mut state = self.state.lock().unwrap();
        for body in bodies {
            state.next_comment_id += 1;
            let comment = Comment {
                id: state.next_comment_id,
                body: body.into(),
            };
            state.comments.entry(issue).or_default().push(comment);
        }
    }

    /// Current comments on an issue, oldest first.
    pub fn comments(&self, issue: u64) -> Vec<Comment> {
        let state = self.state.lock().unwrap();
        state.comments.get(&issue).cloned().unwrap_or_default()
    }

    /// Current labels on an issue.
    pub fn labels(&self, issue: u64) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.labels.get(&issue).cloned().unwrap_or_default()
    }

    /// How many sessions were opened.
    pub fn sessions_opened(&self) -> u64 {
        self.state.lock().unwrap().sessions_opened
    }

    /// Whether every opened session has been closed.
    pub fn all_sessions_closed(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.sessions_opened == state.sessions_closed
    }
}

#[async_trait]
impl ReviewService for MemoryReviewService {
    async fn open_session(&self, _repo: &str) -> Result<Box<dyn ReviewSession>> {
        let mut state = self.state.lock().unwrap();
        state.sessions_opened += 1;
        Ok(Box::new(MemoryReviewSession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MemoryReviewSession {
    state: Arc<Mutex<ReviewState>>,
}

#[async_trait]
impl ReviewSession for MemoryReviewSession {
    async fn list_comments(&self, issue: u64) -> Result<Vec<Comment>> {
        let state = self.state.lock().unwrap();
        Ok(state.comments.get(&issue).cloned().unwrap_or_default())
    }

    async fn create_comment(&self, issue: u64, body: &str) -> Result<Comment> {
        let mut state = self.state.lock().unwrap();
        state.next_comment_id += 1;
        let comment = Comment {
            id: state.next_comment_id,
            body: body.to_string(),
        };
        state
            .comments
            .entry(issue)
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: u64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        for comments in state.comments.values_mut() {
            if let Some(pos) = comments.iter().position(|c| c.id == comment_id) {
                comments.remove(pos);
                return Ok(());
            }
        }
        Err(CheckerError::Review(format!(
            "comment not found: {comment_id}"
        )))
    }

    async fn add_labels(&self, issue: u64, labels: &[&str]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let existing = state.labels.entry(issue).or_default();
        for label in labels {
            if !existing.iter().any(|l| l == label) {
                existing.push(label.to_string());
            }
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.sessions_closed += 1;
        Ok(())
    }
}
