//! Branch-mode dispatch: the checker entrypoint.
//!
//! One invocation per commit-range event, delivered at-least-once by the job
//! runner. Terminal skips resolve locally as `Ok` outcomes; collaborator
//! failures propagate unchanged so the runner owns retry policy. Side
//! effects already committed before a failure are not rolled back.

use std::path::Path;
use std::sync::Arc;

use depwatch_registry::{BranchId, BranchMode, BranchRecord, BranchRegistry, CommitRange};

use crate::config::CheckerConfig;
use crate::diff::{tracked_file_changed, DiffService};
use crate::error::Result;
use crate::notify::NotificationComposer;
use crate::obs::{
    emit_change_detected, emit_check_finished, emit_check_skipped, emit_check_started,
    emit_comments_replaced, emit_label_applied, CheckSpan,
};
use crate::reconcile::{ensure_label, replace_tagged_comments};
use crate::review::ReviewService;

/// Terminal outcome of one checker run.
///
/// Every variant except `Notified` means the run completed without side
/// effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The branch no longer exists in the registry.
    BranchMissing,
    /// The branch is not enabled for this checker.
    NotEnabled,
    /// The branch has no commits recorded, so there is no range to inspect.
    NoCommits,
    /// No changed path matched the tracked base name.
    NoRelevantChange,
    /// A pull request was updated with the canonical comment and label.
    Notified { pr: u64 },
    /// The branch is not a pull request. Deliberately a no-op until a
    /// notification channel for plain branches exists.
    RegularBranchSkipped,
}

impl CheckOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckOutcome::BranchMissing => "branch_missing",
            CheckOutcome::NotEnabled => "not_enabled",
            CheckOutcome::NoCommits => "no_commits",
            CheckOutcome::NoRelevantChange => "no_relevant_change",
            CheckOutcome::Notified { .. } => "notified",
            CheckOutcome::RegularBranchSkipped => "regular_branch_skipped",
        }
    }
}

/// The dependency-manifest checker.
///
/// Holds its collaborators behind trait objects; no state is shared between
/// runs, so concurrent runs for different branches are safe. Two sequential
/// runs over the same branch state converge on one recognized comment and
/// one label, because notification replaces rather than appends.
pub struct ManifestChecker {
    registry: Arc<dyn BranchRegistry>,
    diff: Arc<dyn DiffService>,
    review: Arc<dyn ReviewService>,
    config: CheckerConfig,
}

impl ManifestChecker {
    pub fn new(
        registry: Arc<dyn BranchRegistry>,
        diff: Arc<dyn DiffService>,
        review: Arc<dyn ReviewService>,
        config: CheckerConfig,
    ) -> Self {
        ManifestChecker {
            registry,
            diff,
            review,
            config,
        }
    }

    /// Run the checker for one branch event.
    ///
    /// `_new_commits` is part of the job payload but unused: the inspected
    /// range is always re-derived from the branch record, which is what makes
    /// redelivered jobs converge.
    pub async fn run(&self, branch_id: &BranchId, _new_commits: &[String]) -> Result<CheckOutcome> {
        let _span = CheckSpan::enter(&self.config.checker_key, branch_id.as_str());
        emit_check_started(branch_id.as_str());

        let outcome = self.check(branch_id).await?;
        emit_check_finished(branch_id.as_str(), outcome.as_str());
        Ok(outcome)
    }

    async fn check(&self, branch_id: &BranchId) -> Result<CheckOutcome> {
        let Some(branch) = self.registry.find_branch(branch_id).await? else {
            emit_check_skipped(branch_id.as_str(), "branch no longer exists");
            return Ok(CheckOutcome::BranchMissing);
        };

        if !branch.enabled_for(&self.config.checker_key) {
            emit_check_skipped(branch_id.as_str(), "checker not enabled for repo");
            return Ok(CheckOutcome::NotEnabled);
        }

        let Some(range) = branch.commit_range() else {
            emit_check_skipped(branch_id.as_str(), "branch has no commits");
            return Ok(CheckOutcome::NoCommits);
        };

        let paths = self
            .diff
            .changed_paths(Path::new(&branch.repo.path), &range.first, &range.last)
            .await?;

        if !tracked_file_changed(&paths, &self.config.tracked_basename) {
            emit_check_skipped(branch_id.as_str(), "no tracked file in change set");
            return Ok(CheckOutcome::NoRelevantChange);
        }

        emit_change_detected(
            branch_id.as_str(),
            &self.config.tracked_basename,
            &range.first,
            &range.last,
        );

        match branch.mode() {
            BranchMode::PullRequest { number } => {
                self.notify_pull_request(&branch, &range, number).await?;
                Ok(CheckOutcome::Notified { pr: number })
            }
            BranchMode::Regular => {
                // No notification channel for plain branches yet.
                emit_check_skipped(branch_id.as_str(), "regular branch, nothing to notify");
                Ok(CheckOutcome::RegularBranchSkipped)
            }
        }
    }

    /// Publish the canonical comment and label on the pull request.
    ///
    /// The review session is closed on every exit path; a close failure does
    /// not mask an earlier notification failure.
    async fn notify_pull_request(
        &self,
        branch: &BranchRecord,
        range: &CommitRange,
        pr: u64,
    ) -> Result<()> {
        let composer = NotificationComposer::new(
            self.config.tag.clone(),
            self.config.tracked_basename.clone(),
            self.config.pr_contacts.clone(),
        );
        let body = composer.compose(branch, range);

        let session = self.review.open_session(&branch.repo.fq_name).await?;

        let result: Result<()> = async {
            replace_tagged_comments(session.as_ref(), pr, &body, |text| composer.recognizes(text))
                .await?;
            emit_comments_replaced(pr);

            ensure_label(session.as_ref(), pr, &self.config.label).await?;
            emit_label_applied(pr, &self.config.label);
            Ok(())
        }
        .await;

        let close_result = session.close().await;
        result?;
        close_result
    }
}
