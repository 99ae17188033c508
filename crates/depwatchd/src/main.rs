//! Depwatch worker binary.
//!
//! Invoked once per commit-range event by the job runner with a branch id
//! and the newly pushed commits. Exits zero on any terminal outcome
//! (including skips) and non-zero on collaborator failure, so the runner can
//! retry.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use depwatch_core::{
    init_tracing, CheckerConfig, GitDiffService, GithubReviewService, ManifestChecker,
};
use depwatch_registry::{BranchId, SurrealBranchRegistry};

#[derive(Debug, Parser)]
#[command(name = "depwatchd", version, about = "Dependency manifest watcher job")]
struct Args {
    /// Branch id assigned by the branch registry
    #[arg(long)]
    branch_id: String,

    /// Newly pushed commits (job payload marker; the range is re-derived
    /// from the registry)
    #[arg(long = "new-commit")]
    new_commits: Vec<String>,

    /// Path to a TOML checker configuration; defaults to the Gemfile checker
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Emit newline-delimited JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading checker config {}", path.display()))?;
            CheckerConfig::from_toml_str(&raw)?
        }
        None => CheckerConfig::gemfile(),
    };

    let registry = SurrealBranchRegistry::from_env()
        .await
        .context("connecting branch registry")?;
    let review = GithubReviewService::from_env().context("building review service")?;

    let checker = ManifestChecker::new(
        Arc::new(registry),
        Arc::new(GitDiffService::new()),
        Arc::new(review),
        config,
    );

    let outcome = checker
        .run(&BranchId::new(args.branch_id), &args.new_commits)
        .await?;

    tracing::info!(outcome = outcome.as_str(), "depwatchd job complete");
    Ok(())
}
