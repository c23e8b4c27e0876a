//! Jira REST client (API v3) for single-issue lookups.
//!
//! Endpoint used:
//! - GET /rest/api/3/issue/:key?fields=project,issuetype,status,summary

use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use serde::Deserialize;
use tracing::debug;

use crate::errors::{ConfigError, LintResult};
use crate::tracker::{Ticket, TrackerConfig};

#[derive(Debug, Clone)]
pub struct JiraClient {
    http: Client,
    base_api: String,
    token: String,
}

impl JiraClient {
    /// Constructs a Jira client with a shared reqwest instance.
    pub fn from_config(cfg: TrackerConfig) -> LintResult<Self> {
        if cfg.token.is_empty() {
            return Err(ConfigError::MissingToken("tracker").into());
        }
        if cfg.base_api.is_empty() {
            return Err(ConfigError::InvalidBaseUrl(cfg.base_api).into());
        }
        let http = Client::builder().user_agent("pr-gate/0.1").build()?;
        Ok(Self {
            http,
            base_api: cfg.base_api.trim_end_matches('/').to_string(),
            token: cfg.token,
        })
    }

    /// Fetches one issue. `Ok(None)` means the key does not resolve to a
    /// ticket (HTTP 404); transport faults propagate as errors.
    pub async fn get_issue(&self, key: &str) -> LintResult<Option<Ticket>> {
        let url = format!(
            "{}/rest/api/3/issue/{}?fields=project,issuetype,status,summary",
            self.base_api, key
        );
        debug!("jira: fetch issue key={}", key);
        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Basic {}", self.token))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!("jira: issue {} not found", key);
            return Ok(None);
        }

        let raw: JiraIssue = resp.error_for_status()?.json().await?;
        Ok(Some(Ticket {
            key: raw.key,
            project: raw.fields.project.map(|p| p.name),
            issue_type: raw.fields.issuetype.map(|t| t.name),
            status: raw.fields.status.map(|s| s.name),
            summary: raw.fields.summary,
        }))
    }
}

/// --- Jira response shapes (subset of fields we actually use) ---

#[derive(Debug, Deserialize)]
struct JiraIssue {
    key: String,
    fields: JiraFields,
}

#[derive(Debug, Deserialize)]
struct JiraFields {
    #[serde(default)]
    project: Option<JiraNamed>,
    #[serde(default)]
    issuetype: Option<JiraNamed>,
    #[serde(default)]
    status: Option<JiraNamed>,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JiraNamed {
    name: String,
}
