//! Notification message composition and recognition.

use depwatch_registry::{BranchRecord, CommitRange};

/// Builds the tagged comment body for a detected change, and recognizes
/// bodies it previously built.
///
/// The tag is a fixed literal shared by every invocation of a checker
/// family; recognition is solely a starts-with check on it, so body wording
/// can evolve without stranding old comments.
#[derive(Debug, Clone)]
pub struct NotificationComposer {
    tag: String,
    tracked_basename: String,
    contacts: Vec<String>,
}

impl NotificationComposer {
    pub fn new(
        tag: impl Into<String>,
        tracked_basename: impl Into<String>,
        contacts: Vec<String>,
    ) -> Self {
        NotificationComposer {
            tag: tag.into(),
            tracked_basename: tracked_basename.into(),
            contacts,
        }
    }

    /// Compose the comment body for a change detected in `range`.
    ///
    /// Deterministic: the same branch, range, and contacts always produce the
    /// same text, which is what lets repeated runs replace rather than stack
    /// comments.
    pub fn compose(&self, branch: &BranchRecord, range: &CommitRange) -> String {
        let count = branch.commits.len().max(1);
        let commit_word = if count == 1 { "commit" } else { "commits" };
        let location = format!("{count} {commit_word} {}", self.render_range(branch, range));

        let mut message = format!(
            "{}{} changes detected in {}.",
            self.tag, self.tracked_basename, location
        );
        if !self.contacts.is_empty() {
            message.push_str(&format!(" /cc {}", self.contacts.join(" ")));
        }
        message
    }

    /// Whether `text` was composed by this checker family.
    pub fn recognizes(&self, text: &str) -> bool {
        text.starts_with(&self.tag)
    }

    /// Human-facing range description: endpoint URIs joined by `" .. "`,
    /// collapsed to one URI for a degenerate single-commit range.
    fn render_range(&self, branch: &BranchRecord, range: &CommitRange) -> String {
        let first = branch.commit_uri(&range.first);
        if range.is_single() {
            first
        } else {
            format!("{first} .. {}", branch.commit_uri(&range.last))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use depwatch_registry::{BranchId, RepoRef};

    fn branch(commits: &[&str]) -> BranchRecord {
        BranchRecord {
            branch_id: BranchId::new("b-1"),
            name: "pr/42".to_string(),
            repo: RepoRef {
                fq_name: "acme/widgets".to_string(),
                path: "/repos/acme/widgets".to_string(),
            },
            enabled_checkers: vec!["gemfile_checker".to_string()],
            pr_number: Some(42),
            commits: commits.iter().map(|c| c.to_string()).collect(),
            commit_uri_template: "https://example.com/commit/{sha}".to_string(),
            updated_at: Utc::now(),
        }
    }

    fn composer(contacts: &[&str]) -> NotificationComposer {
        NotificationComposer::new(
            "<gemfile_checker />",
            "Gemfile",
            contacts.iter().map(|c| c.to_string()).collect(),
        )
    }

    #[test]
    fn multi_commit_message_is_plural_with_joined_uris() {
        let branch = branch(&["c1", "c2"]);
        let range = branch.commit_range().unwrap();
        let message = composer(&[]).compose(&branch, &range);

        assert_eq!(
            message,
            "<gemfile_checker />Gemfile changes detected in 2 commits \
             https://example.com/commit/c1 .. https://example.com/commit/c2."
        );
    }

    #[test]
    fn single_commit_message_is_singular_with_one_uri() {
        let branch = branch(&["c1"]);
        let range = branch.commit_range().unwrap();
        let message = composer(&[]).compose(&branch, &range);

        assert_eq!(
            message,
            "<gemfile_checker />Gemfile changes detected in 1 commit \
             https://example.com/commit/c1."
        );
        assert!(!message.contains(" .. "));
    }

    #[test]
    fn contacts_suffix_joined_by_spaces() {
        let branch = branch(&["c1", "c2"]);
        let range = branch.commit_range().unwrap();
        let message = composer(&["@a", "@b"]).compose(&branch, &range);

        assert!(message.ends_with(" /cc @a @b"));
    }

    #[test]
    fn no_contacts_means_no_suffix() {
        let branch = branch(&["c1", "c2"]);
        let range = branch.commit_range().unwrap();
        let message = composer(&[]).compose(&branch, &range);

        assert!(!message.contains("/cc"));
    }

    #[test]
    fn compose_is_deterministic() {
        let branch = branch(&["c1", "c2"]);
        let range = branch.commit_range().unwrap();
        let composer = composer(&["@a"]);

        assert_eq!(
            composer.compose(&branch, &range),
            composer.compose(&branch, &range)
        );
    }

    #[test]
    fn recognizes_own_messages_only_by_tag() {
        let branch = branch(&["c1"]);
        let range = branch.commit_range().unwrap();
        let composer = composer(&[]);
        let message = composer.compose(&branch, &range);

        assert!(composer.recognizes(&message));
        assert!(composer.recognizes("<gemfile_checker />some completely different body"));
        assert!(!composer.recognizes("unrelated comment"));
        assert!(!composer.recognizes("prefix <gemfile_checker /> not at start"));
    }
}
