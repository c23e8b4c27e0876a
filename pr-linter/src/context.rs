//! Pull request snapshot taken from the triggering CI event.

use serde::Deserialize;

use crate::errors::{Error, LintResult};

/// Immutable snapshot of the pull request under lint.
///
/// Built once at run start from the `owner/repo` slug and the event
/// payload; never mutated afterwards. Branch refs the payload does not
/// carry default to empty strings so the orchestrator's start guard can
/// observe them.
#[derive(Debug, Clone)]
pub struct PullRequestContext {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub base_branch: String,
    pub head_branch: String,
    pub title: String,
    pub body: String,
    pub additions: u32,
}

impl PullRequestContext {
    /// Parses a pull-request event payload. `repository` is the
    /// `owner/repo` slug the runner provides alongside the payload.
    pub fn from_event(repository: &str, payload: &str) -> LintResult<Self> {
        let (owner, repo) = repository
            .split_once('/')
            .ok_or_else(|| Error::Context(format!("malformed repository slug: {repository}")))?;

        let event: EventPayload = serde_json::from_str(payload)
            .map_err(|e| Error::Context(format!("unreadable event payload: {e}")))?;
        let pr = event
            .pull_request
            .ok_or_else(|| Error::Context("event payload carries no pull request".into()))?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number: pr.number,
            base_branch: pr.base.map(|b| b.ref_name).unwrap_or_default(),
            head_branch: pr.head.map(|b| b.ref_name).unwrap_or_default(),
            title: pr.title.unwrap_or_default(),
            body: pr.body.unwrap_or_default(),
            additions: pr.additions.unwrap_or(0),
        })
    }
}

/// --- Event payload shapes (subset of fields we actually use) ---

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    pull_request: Option<PullRequestPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    additions: Option<u32>,
    #[serde(default)]
    base: Option<BranchRef>,
    #[serde(default)]
    head: Option<BranchRef>,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    ref_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "action": "opened",
        "pull_request": {
            "number": 42,
            "title": "Fix the widget",
            "body": "Closes nothing.",
            "additions": 17,
            "base": { "ref": "main" },
            "head": { "ref": "feature/ABC-123-fix-widget" }
        }
    }"#;

    #[test]
    fn parses_pull_request_event() {
        let ctx = PullRequestContext::from_event("acme/widgets", PAYLOAD).unwrap();
        assert_eq!(ctx.owner, "acme");
        assert_eq!(ctx.repo, "widgets");
        assert_eq!(ctx.number, 42);
        assert_eq!(ctx.base_branch, "main");
        assert_eq!(ctx.head_branch, "feature/ABC-123-fix-widget");
        assert_eq!(ctx.title, "Fix the widget");
        assert_eq!(ctx.additions, 17);
    }

    #[test]
    fn missing_branch_refs_default_to_empty() {
        let payload = r#"{ "pull_request": { "number": 7 } }"#;
        let ctx = PullRequestContext::from_event("acme/widgets", payload).unwrap();
        assert!(ctx.head_branch.is_empty());
        assert!(ctx.base_branch.is_empty());
        assert_eq!(ctx.additions, 0);
    }

    #[test]
    fn rejects_payload_without_pull_request() {
        let err = PullRequestContext::from_event("acme/widgets", r#"{ "action": "push" }"#);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_malformed_repository_slug() {
        assert!(PullRequestContext::from_event("acme", PAYLOAD).is_err());
    }
}
