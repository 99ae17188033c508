//! Structured observability hooks for checker runs.
//!
//! Events are emitted at `info!` level. Skips are informational, never
//! errors: a deleted branch or an irrelevant push is a normal terminal
//! condition for a run.

use tracing::info;

/// RAII guard that enters a checker-scoped tracing span for one run.
pub struct CheckSpan {
    _span: tracing::span::EnteredSpan,
}

impl CheckSpan {
    /// Create and enter a span tagged with the checker key and branch id.
    pub fn enter(checker_key: &str, branch_id: &str) -> Self {
        let span = tracing::info_span!("depwatch.check", checker = %checker_key, branch_id = %branch_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: check started for a branch.
pub fn emit_check_started(branch_id: &str) {
    info!(event = "check.started", branch_id = %branch_id);
}

/// Emit event: check skipped with a terminal reason (branch missing, not
/// enabled, no commits, no relevant change, regular branch).
pub fn emit_check_skipped(branch_id: &str, reason: &str) {
    info!(event = "check.skipped", branch_id = %branch_id, reason = %reason);
}

/// Emit event: tracked file changed within the inspected range.
pub fn emit_change_detected(branch_id: &str, basename: &str, first: &str, last: &str) {
    info!(
        event = "check.change_detected",
        branch_id = %branch_id,
        basename = %basename,
        first = %first,
        last = %last,
    );
}

/// Emit event: stale comments replaced with the canonical notice.
pub fn emit_comments_replaced(pr: u64) {
    info!(event = "check.comments_replaced", pr = pr);
}

/// Emit event: label ensured on the pull request.
pub fn emit_label_applied(pr: u64, label: &str) {
    info!(event = "check.label_applied", pr = pr, label = %label);
}

/// Emit event: check finished with its outcome.
pub fn emit_check_finished(branch_id: &str, outcome: &str) {
    info!(event = "check.finished", branch_id = %branch_id, outcome = %outcome);
}
