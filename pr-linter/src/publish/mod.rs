//! Idempotent annotation publisher.
//!
//! Fetches the existing PR comments once per run, then applies planned
//! actions in order. A comment whose body was already posted (compared
//! case-insensitively against the snapshot) is skipped, so repeated
//! runs converge instead of accumulating duplicates. Labels and the
//! description rely on API/merge semantics for idempotence and are
//! always sent.
//!
//! Dry-run computes and logs every action without calling the
//! annotation APIs; dedup bookkeeping and verdicts are unchanged.

pub mod github;
pub use github::GitHubClient;

use std::collections::HashSet;

use tracing::{debug, info};

use crate::context::PullRequestContext;
use crate::errors::LintResult;
use crate::plan::Action;

/// Result of applying a single planned action.
#[derive(Debug, Clone)]
pub struct PublishedAnnotation {
    /// Was a network call performed (false for duplicates, empty label
    /// sets and dry-run)?
    pub performed: bool,
    /// Reason when the action was skipped.
    pub skipped_reason: Option<String>,
}

pub struct Publisher {
    client: GitHubClient,
    owner: String,
    repo: String,
    number: u64,
    dry_run: bool,
    /// Lowercased bodies of every comment on the PR at run start, plus
    /// everything posted during this run.
    existing: HashSet<String>,
}

impl Publisher {
    /// Snapshots the current comment list; done once per run, before
    /// any comment is posted.
    pub async fn prepare(
        client: GitHubClient,
        ctx: &PullRequestContext,
        dry_run: bool,
    ) -> LintResult<Self> {
        let bodies = client
            .list_comment_bodies(&ctx.owner, &ctx.repo, ctx.number)
            .await?;
        info!("step6: existing comments={}", bodies.len());
        Ok(Self::with_existing(client, ctx, dry_run, bodies))
    }

    /// Constructs a publisher over an already-fetched comment snapshot.
    pub fn with_existing(
        client: GitHubClient,
        ctx: &PullRequestContext,
        dry_run: bool,
        bodies: Vec<String>,
    ) -> Self {
        Self {
            client,
            owner: ctx.owner.clone(),
            repo: ctx.repo.clone(),
            number: ctx.number,
            dry_run,
            existing: bodies.into_iter().map(|b| b.to_lowercase()).collect(),
        }
    }

    /// Exact case-insensitive match against the snapshot.
    pub fn already_posted(&self, body: &str) -> bool {
        self.existing.contains(&body.to_lowercase())
    }

    /// Applies one planned action.
    pub async fn apply(&mut self, action: &Action) -> LintResult<PublishedAnnotation> {
        match action {
            Action::PostComment(body) => self.publish_comment(body).await,
            Action::AddLabels(labels) => self.publish_labels(labels).await,
            Action::UpdateDescription(body) => self.publish_description(body).await,
        }
    }

    async fn publish_comment(&mut self, body: &str) -> LintResult<PublishedAnnotation> {
        if self.already_posted(body) {
            debug!("step6: skip duplicate comment");
            return Ok(skipped("duplicate"));
        }
        if self.dry_run {
            debug!("step6: dry-run comment chars={}", body.chars().count());
            return Ok(skipped("dry-run"));
        }
        self.client
            .create_comment(&self.owner, &self.repo, self.number, body)
            .await?;
        self.existing.insert(body.to_lowercase());
        Ok(performed())
    }

    async fn publish_labels(&self, labels: &[String]) -> LintResult<PublishedAnnotation> {
        if labels.is_empty() {
            debug!("step6: no labels to add");
            return Ok(skipped("empty label set"));
        }
        if self.dry_run {
            debug!("step6: dry-run labels={:?}", labels);
            return Ok(skipped("dry-run"));
        }
        self.client
            .add_labels(&self.owner, &self.repo, self.number, labels)
            .await?;
        Ok(performed())
    }

    async fn publish_description(&self, body: &str) -> LintResult<PublishedAnnotation> {
        if self.dry_run {
            debug!("step6: dry-run description chars={}", body.chars().count());
            return Ok(skipped("dry-run"));
        }
        self.client
            .update_description(&self.owner, &self.repo, self.number, body)
            .await?;
        Ok(performed())
    }
}

fn performed() -> PublishedAnnotation {
    PublishedAnnotation {
        performed: true,
        skipped_reason: None,
    }
}

fn skipped(reason: &str) -> PublishedAnnotation {
    PublishedAnnotation {
        performed: false,
        skipped_reason: Some(reason.to_string()),
    }
}
