//! GitHub-backed review service
//!
//! Implements the review collaborator against the GitHub REST API. Comments
//! and labels live on the issue that backs the pull request; adding a label
//! that is already present is a no-op on GitHub's side, which is what the
//! checker's idempotence relies on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CheckerError, Result};
use crate::review::{Comment, ReviewService, ReviewSession};

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// API base URL (override for GitHub Enterprise or test servers)
    pub api_url: String,
    /// Authentication token (optional for read-only use against public repos)
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".to_string()),
            token: std::env::var("GITHUB_TOKEN").ok(),
        }
    }
}

impl GithubConfig {
    /// Create a config from environment variables.
    ///
    /// Reads `GITHUB_API_URL` (optional) and `GITHUB_TOKEN` (optional).
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific API endpoint.
    pub fn new(api_url: &str) -> Self {
        GithubConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Set authentication token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// Review service talking to the GitHub REST API.
pub struct GithubReviewService {
    config: GithubConfig,
    http_client: reqwest::Client,
}

impl GithubReviewService {
    /// Create a new GitHub review service.
    pub fn new(config: GithubConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("depwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CheckerError::Review(format!("failed to build HTTP client: {e}")))?;

        Ok(GithubReviewService {
            config,
            http_client,
        })
    }

    /// Create service from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GithubConfig::from_env())
    }
}

#[async_trait]
impl ReviewService for GithubReviewService {
    async fn open_session(&self, repo: &str) -> Result<Box<dyn ReviewSession>> {
        debug!(repo = %repo, "opening GitHub session");
        Ok(Box::new(GithubSession {
            client: self.http_client.clone(),
            api_url: self.config.api_url.clone(),
            token: self.config.token.clone(),
            repo: repo.to_string(),
        }))
    }
}

/// Wire representation of an issue comment.
#[derive(Debug, Deserialize)]
struct GhComment {
    id: u64,
    // GitHub serves null bodies for some comment kinds
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewComment<'a> {
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct NewLabels<'a> {
    labels: &'a [&'a str],
}

struct GithubSession {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    repo: String,
}

impl GithubSession {
    fn issue_comments_url(&self, issue: u64) -> String {
        format!("{}/repos/{}/issues/{}/comments", self.api_url, self.repo, issue)
    }

    fn comment_url(&self, comment_id: u64) -> String {
        format!("{}/repos/{}/issues/comments/{}", self.api_url, self.repo, comment_id)
    }

    fn labels_url(&self, issue: u64) -> String {
        format!("{}/repos/{}/issues/{}/labels", self.api_url, self.repo, issue)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_checked(
        &self,
        builder: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<reqwest::Response> {
        let response = self
            .request(builder)
            .send()
            .await
            .map_err(|e| CheckerError::Review(format!("{what}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckerError::Review(format!(
                "{what}: HTTP {status}: {body}"
            )));
        }
        Ok(response)
    }
}

/// GitHub's maximum page size for issue comment listings.
const PAGE_SIZE: usize = 100;

#[async_trait]
impl ReviewSession for GithubSession {
    async fn list_comments(&self, issue: u64) -> Result<Vec<Comment>> {
        // Comment replacement must see every comment on the issue, so walk
        // all pages; a short page marks the end of the listing.
        let mut comments = Vec::new();
        let mut page = 1u32;

        loop {
            let response = self
                .send_checked(
                    self.client.get(self.issue_comments_url(issue)).query(&[
                        ("per_page", PAGE_SIZE.to_string().as_str()),
                        ("page", page.to_string().as_str()),
                    ]),
                    "list comments",
                )
                .await?;

            let batch: Vec<GhComment> = response
                .json()
                .await
                .map_err(|e| CheckerError::Review(format!("decode comments: {e}")))?;

            let last_page = batch.len() < PAGE_SIZE;
            comments.extend(batch.into_iter().map(|c| Comment {
                id: c.id,
                body: c.body.unwrap_or_default(),
            }));

            if last_page {
                return Ok(comments);
            }
            page += 1;
        }
    }

    async fn create_comment(&self, issue: u64, body: &str) -> Result<Comment> {
        let response = self
            .send_checked(
                self.client
                    .post(self.issue_comments_url(issue))
                    .json(&NewComment { body }),
                "create comment",
            )
            .await?;

        let created: GhComment = response
            .json()
            .await
            .map_err(|e| CheckerError::Review(format!("decode created comment: {e}")))?;

        Ok(Comment {
            id: created.id,
            body: created.body.unwrap_or_default(),
        })
    }

    async fn delete_comment(&self, comment_id: u64) -> Result<()> {
        self.send_checked(
            self.client.delete(self.comment_url(comment_id)),
            "delete comment",
        )
        .await?;
        Ok(())
    }

    async fn add_labels(&self, issue: u64, labels: &[&str]) -> Result<()> {
        self.send_checked(
            self.client
                .post(self.labels_url(issue))
                .json(&NewLabels { labels }),
            "add labels",
        )
        .await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        // HTTP sessions hold no server-side state; closing is bookkeeping only.
        debug!(repo = %self.repo, "closing GitHub session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve canned JSON pages for `GET .../comments?per_page=N&page=M`.
    /// Unknown pages get an empty array. One request per connection.
    async fn serve_comment_pages(listener: TcpListener, pages: Vec<String>) {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let pages = pages.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                loop {
                    let Ok(n) = stream.read(&mut buf[read..]).await else {
                        return;
                    };
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                let page: usize = request
                    .split("&page=")
                    .nth(1)
                    .map(|rest| rest.chars().take_while(|c| c.is_ascii_digit()).collect::<String>())
                    .and_then(|digits| digits.parse().ok())
                    .unwrap_or(1);

                let body = pages.get(page - 1).cloned().unwrap_or_else(|| "[]".to_string());
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    }

    #[tokio::test]
    async fn list_comments_walks_every_page() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // A full first page, then a short second page holding the one stale
        // tagged notice. An unpaginated listing would never see it.
        let page1: Vec<serde_json::Value> = (1..=100)
            .map(|i| serde_json::json!({ "id": i, "body": "a human reviewer comment" }))
            .collect();
        let page2 = vec![serde_json::json!({
            "id": 101,
            "body": "<gemfile_checker />stale notice"
        })];
        let pages = vec![
            serde_json::to_string(&page1).unwrap(),
            serde_json::to_string(&page2).unwrap(),
        ];
        tokio::spawn(serve_comment_pages(listener, pages));

        let service =
            GithubReviewService::new(GithubConfig::new(&format!("http://{addr}"))).unwrap();
        let session = service.open_session("acme/widgets").await.unwrap();
        let comments = session.list_comments(7).await.unwrap();
        session.close().await.unwrap();

        assert_eq!(comments.len(), 101);
        assert!(
            comments
                .iter()
                .any(|c| c.id == 101 && c.body.starts_with("<gemfile_checker />")),
            "tagged comment past the first page must be visible to reconciliation"
        );
    }

    #[test]
    fn config_new_strips_trailing_slash() {
        let config = GithubConfig::new("https://ghe.example.com/api/v3/");
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn config_with_token_sets_token() {
        let config = GithubConfig::new("https://api.github.com").with_token("secret");
        assert_eq!(config.token.as_deref(), Some("secret"));
    }

    #[test]
    fn session_urls_are_scoped_to_repo() {
        let session = GithubSession {
            client: reqwest::Client::new(),
            api_url: "https://api.github.com".to_string(),
            token: None,
            repo: "acme/widgets".to_string(),
        };

        assert_eq!(
            session.issue_comments_url(42),
            "https://api.github.com/repos/acme/widgets/issues/42/comments"
        );
        assert_eq!(
            session.comment_url(7),
            "https://api.github.com/repos/acme/widgets/issues/comments/7"
        );
        assert_eq!(
            session.labels_url(42),
            "https://api.github.com/repos/acme/widgets/issues/42/labels"
        );
    }
}
