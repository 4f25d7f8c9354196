//! GitHub provider (REST v3) for PR metadata, files and review comments.
//!
//! Endpoints used:
//! - GET    /repos/:owner/:repo/pulls/:number
//! - GET    /repos/:owner/:repo/pulls/:number/files      (paginated)
//! - GET    /repos/:owner/:repo/contents/:path?ref=:sha
//! - GET    /repos/:owner/:repo/pulls/:number/comments   (paginated)
//! - POST   /repos/:owner/:repo/pulls/:number/comments
//! - DELETE /repos/:owner/:repo/pulls/comments/:id
//! - GET    /user

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ReviewConfig;
use crate::errors::{ConfigError, ProviderError, ReviewResult};
use crate::git_providers::ReviewPlatform;
use crate::git_providers::types::*;

/// Page size for list endpoints (GitHub maximum).
const PER_PAGE: usize = 100;

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // e.g. "https://api.github.com"
    repo: String,     // "owner/name"
    pr_number: u64,
}

impl GitHubClient {
    /// Builds a client for the PR named in `cfg`, with auth headers preset.
    pub fn new(cfg: &ReviewConfig) -> ReviewResult<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("token {}", cfg.github_token))
            .map_err(|_| ConfigError::InvalidValue {
                var: "GITHUB_TOKEN",
                value: "<redacted>".to_string(),
            })?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let http = Client::builder()
            .user_agent("pr-review-bot/0.1")
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_api: cfg.api_base.trim_end_matches('/').to_string(),
            repo: cfg.repo.clone(),
            pr_number: cfg.pr_number,
        })
    }

    fn repo_url(&self) -> String {
        format!("{}/repos/{}", self.base_api, self.repo)
    }

    fn pull_url(&self) -> String {
        format!("{}/pulls/{}", self.repo_url(), self.pr_number)
    }

    /// Fetches every page of a list endpoint until an empty or short page.
    async fn get_all<T: DeserializeOwned>(&self, url: &str) -> ReviewResult<Vec<T>> {
        let mut out = Vec::new();
        let mut page = 1usize;
        loop {
            let resp = self
                .http
                .get(url)
                .query(&[("page", page), ("per_page", PER_PAGE)])
                .send()
                .await?;
            let batch: Vec<T> = check(resp).await?.json().await?;
            let n = batch.len();
            debug!(url, page, n, "fetched page");
            out.extend(batch);
            if n < PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(out)
    }
}

impl ReviewPlatform for GitHubClient {
    async fn pull_request(&self) -> ReviewResult<PullRequest> {
        let resp = self.http.get(self.pull_url()).send().await?;
        let pr: GitHubPull = check(resp).await?.json().await?;
        Ok(PullRequest {
            number: pr.number,
            title: pr.title,
            head_sha: pr.head.sha,
            base_sha: pr.base.sha,
        })
    }

    async fn changed_files(&self) -> ReviewResult<Vec<ChangedFile>> {
        self.get_all(&format!("{}/files", self.pull_url())).await
    }

    async fn file_content(&self, path: &str, git_ref: &str) -> ReviewResult<Option<String>> {
        let url = format!("{}/contents/{}", self.repo_url(), encode_path(path));
        let resp = self
            .http
            .get(url)
            .query(&[("ref", git_ref)])
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(path, git_ref, "file not found at ref");
            return Ok(None);
        }
        let body: GitHubContents = check(resp).await?.json().await?;
        decode_contents(path, &body)
    }

    async fn review_comments(&self) -> ReviewResult<Vec<ReviewComment>> {
        self.get_all(&format!("{}/comments", self.pull_url())).await
    }

    async fn post_comment(&self, comment: &NewComment) -> ReviewResult<()> {
        let url = format!("{}/comments", self.pull_url());
        let resp = self.http.post(url).json(comment).send().await?;
        check(resp).await?;
        Ok(())
    }

    async fn authenticated_user(&self) -> ReviewResult<User> {
        let resp = self
            .http
            .get(format!("{}/user", self.base_api))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn delete_comment(&self, id: u64) -> ReviewResult<()> {
        let url = format!("{}/pulls/comments/{}", self.repo_url(), id);
        let resp = self.http.delete(url).send().await?;
        check(resp).await?;
        Ok(())
    }
}

/// Passes successful responses through; logs the body of failures and maps
/// the status to a [`ProviderError`].
async fn check(resp: Response) -> ReviewResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    warn!(%status, %url, body = %snippet(&body), "github request failed");
    Err(ProviderError::from_status(status.as_u16()).into())
}

fn snippet(s: &str) -> String {
    const MAX: usize = 300;
    if s.chars().count() <= MAX {
        return s.to_string();
    }
    s.chars().take(MAX).collect::<String>() + "…"
}

/// Percent-encodes each path segment, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn decode_contents(path: &str, body: &GitHubContents) -> ReviewResult<Option<String>> {
    if body.encoding.as_deref().is_some_and(|e| e != "base64") {
        return Err(ProviderError::InvalidResponse(format!(
            "unsupported contents encoding for {path}: {:?}",
            body.encoding
        ))
        .into());
    }
    let Some(content) = body.content.as_deref() else {
        return Ok(None);
    };

    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| ProviderError::InvalidResponse(format!("base64 for {path}: {e}")))?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(_) => {
            debug!(path, "file is not valid UTF-8");
            Ok(None)
        }
    }
}

/// --- GitHub response shapes (subset of fields we actually use) ---

#[derive(Debug, Deserialize)]
struct GitHubPull {
    number: u64,
    title: String,
    head: GitHubRef,
    base: GitHubRef,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubContents {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}
