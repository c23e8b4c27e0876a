//! GitHub annotation client.
//!
//! Endpoints used:
//! - GET   /repos/:owner/:repo/issues/:number/comments   (idempotency snapshot)
//! - POST  /repos/:owner/:repo/issues/:number/comments
//! - POST  /repos/:owner/:repo/issues/:number/labels
//! - PATCH /repos/:owner/:repo/pulls/:number

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ConfigError, Error, LintResult};

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    headers: HeaderMap,
    base_api: String,
}

impl GitHubClient {
    /// Constructs a client for api.github.com (or an enterprise base).
    pub fn from_token(base_api: &str, token: &str) -> LintResult<Self> {
        if token.is_empty() {
            return Err(ConfigError::MissingToken("github").into());
        }
        let http = build_http_client()?;
        let headers = build_github_headers(token)?;
        Ok(Self {
            http,
            headers,
            base_api: base_api.trim_end_matches('/').to_string(),
        })
    }

    /// Full comment list for the PR, bodies only, in posting order.
    pub async fn list_comment_bodies(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> LintResult<Vec<String>> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments?per_page=100",
            self.base_api, owner, repo, number
        );
        let comments: Vec<IssueComment> = self
            .http
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(comments.into_iter().filter_map(|c| c.body).collect())
    }

    pub async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> LintResult<()> {
        #[derive(Serialize)]
        struct Req<'a> {
            body: &'a str,
        }
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_api, owner, repo, number
        );
        debug!("github: POST comment chars={}", body.chars().count());
        self.http
            .post(url)
            .headers(self.headers.clone())
            .json(&Req { body })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Re-adding an already-present label is a no-op on the API side, so
    /// no local dedup against applied labels is needed.
    pub async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> LintResult<()> {
        #[derive(Serialize)]
        struct Req<'a> {
            labels: &'a [String],
        }
        let url = format!(
            "{}/repos/{}/{}/issues/{}/labels",
            self.base_api, owner, repo, number
        );
        debug!("github: POST labels {:?}", labels);
        self.http
            .post(url)
            .headers(self.headers.clone())
            .json(&Req { labels })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn update_description(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> LintResult<()> {
        #[derive(Serialize)]
        struct Req<'a> {
            body: &'a str,
        }
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api, owner, repo, number
        );
        debug!("github: PATCH description chars={}", body.chars().count());
        self.http
            .patch(url)
            .headers(self.headers.clone())
            .json(&Req { body })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn build_http_client() -> LintResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

fn build_github_headers(token: &str) -> LintResult<HeaderMap> {
    let mut h = HeaderMap::new();
    h.insert(USER_AGENT, HeaderValue::from_static("pr-gate/0.1"));
    h.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
    h.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    h.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| Error::Validation(format!("bad token: {e}")))?,
    );
    Ok(h)
}

/// --- GitHub response shapes (subset of fields we actually use) ---

#[derive(Debug, Deserialize)]
struct IssueComment {
    #[serde(default)]
    body: Option<String>,
}
