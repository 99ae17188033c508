//! Diff collaborator and tracked-file change detection.
//!
//! The checker never computes diffs itself: it asks a [`DiffService`] for the
//! changed paths of a commit range and only inspects base names.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{CheckerError, Result};

/// Changed-path provider for a commit range.
#[async_trait]
pub trait DiffService: Send + Sync {
    /// Paths changed between `first` and `last` (inclusive of `first`).
    ///
    /// Both commits must be known to the repository at `repo_path`. Errors
    /// (unknown commits, unreadable range) propagate; there is no retry.
    async fn changed_paths(&self, repo_path: &Path, first: &str, last: &str)
        -> Result<Vec<String>>;
}

/// Diff service backed by the `git` CLI.
///
/// Runs `git diff --name-only <first>^ <last>` in the repository working
/// directory. Diffing from the first commit's parent makes the range
/// inclusive and handles the degenerate single-commit range (`first == last`)
/// by returning that commit's own changes.
#[derive(Debug, Default)]
pub struct GitDiffService;

impl GitDiffService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DiffService for GitDiffService {
    async fn changed_paths(
        &self,
        repo_path: &Path,
        first: &str,
        last: &str,
    ) -> Result<Vec<String>> {
        let parent = format!("{first}^");
        let output = Command::new("git")
            .args(["diff", "--name-only", &parent, last])
            .current_dir(repo_path)
            .output()
            .await
            .map_err(|e| CheckerError::Git(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CheckerError::Git(format!(
                "git diff {parent} {last} failed: {stderr}"
            )));
        }

        let paths = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        Ok(paths)
    }
}

/// Whether any changed path's base name equals `basename` exactly.
///
/// Matches the final path segment only: `sub/Gemfile` counts for `Gemfile`,
/// `Gemfile.lock` does not.
pub fn tracked_file_changed(paths: &[String], basename: &str) -> bool {
    paths
        .iter()
        .any(|p| p.rsplit('/').next() == Some(basename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command as StdCommand;

    fn strings(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn detects_top_level_match() {
        assert!(tracked_file_changed(&strings(&["Gemfile"]), "Gemfile"));
    }

    #[test]
    fn detects_nested_match() {
        let paths = strings(&["README.md", "lib/sub/Gemfile"]);
        assert!(tracked_file_changed(&paths, "Gemfile"));
    }

    #[test]
    fn ignores_suffix_variants() {
        let paths = strings(&["Gemfile.lock", "spec/Gemfile.lock"]);
        assert!(!tracked_file_changed(&paths, "Gemfile"));
    }

    #[test]
    fn ignores_unrelated_paths() {
        let paths = strings(&["README.md", "src/main.rs"]);
        assert!(!tracked_file_changed(&paths, "Gemfile"));
    }

    #[test]
    fn empty_change_set_never_matches() {
        assert!(!tracked_file_changed(&[], "Gemfile"));
    }

    // -- GitDiffService against a real temp repository ----------------------

    fn run_git(repo_dir: &Path, args: &[&str]) {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn head_sha(repo_dir: &Path) -> String {
        let output = StdCommand::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(repo_dir)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    fn commit_file(repo_dir: &Path, name: &str, contents: &str, message: &str) -> String {
        std::fs::write(repo_dir.join(name), contents).unwrap();
        run_git(repo_dir, &["add", "."]);
        run_git(repo_dir, &["commit", "-m", message]);
        head_sha(repo_dir)
    }

    fn make_git_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        dir
    }

    #[tokio::test]
    async fn changed_paths_spans_commit_range() {
        let repo = make_git_repo();
        let c1 = commit_file(repo.path(), "Gemfile", "gem 'rails'", "add gemfile");
        let c2 = commit_file(repo.path(), "README.md", "docs", "add readme");

        let paths = GitDiffService::new()
            .changed_paths(repo.path(), &c1, &c2)
            .await
            .unwrap();

        assert!(paths.contains(&"Gemfile".to_string()));
        assert!(paths.contains(&"README.md".to_string()));
    }

    #[tokio::test]
    async fn changed_paths_single_commit_range() {
        let repo = make_git_repo();
        commit_file(repo.path(), "README.md", "docs", "add readme");
        let c2 = commit_file(repo.path(), "Gemfile", "gem 'rails'", "add gemfile");

        let paths = GitDiffService::new()
            .changed_paths(repo.path(), &c2, &c2)
            .await
            .unwrap();

        assert_eq!(paths, vec!["Gemfile".to_string()]);
    }

    #[tokio::test]
    async fn changed_paths_unknown_commit_is_error() {
        let repo = make_git_repo();
        let result = GitDiffService::new()
            .changed_paths(repo.path(), "0000000000000000000000000000000000000000", "HEAD")
            .await;
        assert!(matches!(result, Err(CheckerError::Git(_))));
    }
}
