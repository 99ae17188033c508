//! Comment reconciliation and label application.

use tracing::debug;

use crate::error::Result;
use crate::review::ReviewSession;

/// Replace every recognized comment on an issue with a single fresh one.
///
/// All existing comments accepted by `recognizer` are deleted and exactly one
/// comment with `new_body` is created, regardless of how many stale ones
/// existed (0, 1, or many). Running the checker repeatedly therefore never
/// accumulates duplicate notices.
///
/// A partial failure (some deletions done, creation failed, or vice versa)
/// propagates as an error; there is no retry and no rollback of what already
/// happened.
pub async fn replace_tagged_comments(
    session: &dyn ReviewSession,
    issue: u64,
    new_body: &str,
    recognizer: impl Fn(&str) -> bool,
) -> Result<()> {
    let stale: Vec<u64> = session
        .list_comments(issue)
        .await?
        .into_iter()
        .filter(|c| recognizer(&c.body))
        .map(|c| c.id)
        .collect();

    debug!(issue = issue, stale = stale.len(), "replacing recognized comments");

    for comment_id in stale {
        session.delete_comment(comment_id).await?;
    }

    session.create_comment(issue, new_body).await?;
    Ok(())
}

/// Ensure a label is present on an issue.
///
/// The review service treats adding an already-present label as a no-op, so
/// this is safe to call on every run.
pub async fn ensure_label(session: &dyn ReviewSession, issue: u64, label: &str) -> Result<()> {
    session.add_labels(issue, &[label]).await
}
