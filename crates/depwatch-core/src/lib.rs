//! Depwatch Core Library
//!
//! Change detection and idempotent PR notification for dependency manifest
//! files. Given a branch's pushed commit range, the checker decides whether a
//! tracked file (canonically `Gemfile`) changed, and if so posts exactly one
//! tagged comment and a label on the associated pull request. Repeated runs
//! converge on the same end state.

pub mod checker;
pub mod config;
pub mod diff;
pub mod error;
pub mod fakes;
pub mod github;
pub mod notify;
pub mod obs;
pub mod reconcile;
pub mod review;
pub mod telemetry;

pub use checker::{CheckOutcome, ManifestChecker};
pub use config::CheckerConfig;
pub use diff::{tracked_file_changed, DiffService, GitDiffService};
pub use error::{CheckerError, Result};
pub use github::{GithubConfig, GithubReviewService};
pub use notify::NotificationComposer;
pub use reconcile::{ensure_label, replace_tagged_comments};
pub use review::{Comment, ReviewService, ReviewSession};
pub use telemetry::init_tracing;

pub use depwatch_registry::{BranchId, BranchMode, BranchRecord, CommitRange};

/// Depwatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
