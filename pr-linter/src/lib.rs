//! Public entry for the pr-linter gate.
//!
//! Single high-level function to run the whole lint flow for one pull
//! request event.
//!
//! 1) **Context guard**: fail fast (with a diagnostic comment) when
//!    the head/base branches cannot be determined.
//! 2) **Branch exemption**: branches matching the configured ignore
//!    pattern end the run with a neutral outcome, before any network
//!    call is made.
//! 3) **Key extraction**: every issue key in the branch name; the
//!    last match is authoritative.
//! 4) **Ticket fetch**: one tracker round trip; "not found" is data,
//!    not an error.
//! 5) **Plan**: pure decision phase producing labels, comment bodies,
//!    the description merge and the verdict. Policy violations
//!    accumulate into the verdict instead of being thrown.
//! 6) **Publish**: idempotent application of the plan against the
//!    code host; duplicate comments are skipped, not reposted.
//!
//! The flow uses `tracing` for step-tagged debug logging and plain
//! `async fn` over thin concrete clients (no async-trait, no
//! `Box<dyn ...>`). Collaborator calls are awaited one at a time in
//! state-machine order; nothing here fans out.

pub mod annotations;
pub mod branch;
pub mod context;
pub mod errors;
pub mod plan;
pub mod policy;
pub mod publish;
pub mod tracker;

use std::time::Instant;

use tracing::{debug, info};

use errors::LintResult;
use publish::{GitHubClient, Publisher};

/// Everything the gate needs for one run, collected by the caller and
/// passed in explicitly. No global state.
#[derive(Debug, Clone)]
pub struct LintConfig {
    pub tracker: TrackerConfig,
    pub github_token: String,
    pub github_base_api: String,
    /// Branches matching this pattern are exempt; empty matches nothing.
    pub branch_ignore_pattern: String,
    /// Suppress the informational title / huge-PR comments.
    pub skip_comments: bool,
    pub additions_threshold: u32,
    pub validate_status: bool,
    pub allowed_statuses: Vec<String>,
    /// Log planned annotations without calling the annotation APIs.
    pub dry_run: bool,
}

impl LintConfig {
    /// Reads the configuration from the process environment, falling
    /// back to defaults where a value is absent or unparseable.
    pub fn from_env() -> Self {
        Self {
            tracker: TrackerConfig {
                base_api: env_str("JIRA_BASE_URL", ""),
                token: env_str("JIRA_TOKEN", ""),
            },
            github_token: env_str("GITHUB_TOKEN", ""),
            github_base_api: env_str("GITHUB_API_URL", "https://api.github.com"),
            branch_ignore_pattern: env_str("BRANCH_IGNORE_PATTERN", ""),
            skip_comments: env_bool("SKIP_COMMENTS", false),
            additions_threshold: env_u32(
                "PR_ADDITIONS_THRESHOLD",
                policy::DEFAULT_ADDITIONS_THRESHOLD,
            ),
            validate_status: env_bool("VALIDATE_ISSUE_STATUS", false),
            allowed_statuses: env_list("ALLOWED_ISSUE_STATUSES"),
            dry_run: env_bool("PR_LINT_DRY_RUN", false),
        }
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .ok()
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Runs the whole lint flow for a single pull request event and returns
/// the verdict. Policy violations surface inside the verdict; only
/// configuration, context and transport faults return `Err`.
pub async fn run_lint(
    cfg: &LintConfig,
    ctx: &context::PullRequestContext,
) -> LintResult<Verdict> {
    let t0 = Instant::now();

    // ---------------------------------
    // Step 1: context guard
    // ---------------------------------
    if ctx.head_branch.is_empty() || ctx.base_branch.is_empty() {
        debug!("step1: head/base branch missing");
        let client = GitHubClient::from_token(&cfg.github_base_api, &cfg.github_token)?;
        let mut publisher = Publisher::prepare(client, ctx, cfg.dry_run).await?;
        publisher
            .apply(&Action::PostComment(annotations::branches_missing_comment()))
            .await?;
        return Ok(Verdict::Fail(
            "unable to determine head and base branches".to_string(),
        ));
    }
    debug!("step1: head={} base={}", ctx.head_branch, ctx.base_branch);

    // ---------------------------------
    // Step 2: branch exemption
    // ---------------------------------
    if branch::should_skip_lint(&ctx.head_branch, &cfg.branch_ignore_pattern)? {
        info!("step2: branch {} is exempt from lint", ctx.head_branch);
        return Ok(Verdict::Skipped);
    }

    // ---------------------------------
    // Step 3: issue keys from the branch
    // ---------------------------------
    let keys = branch::extract_issue_keys(&ctx.head_branch);
    let key = branch::authoritative_key(&keys);
    debug!("step3: keys={:?} authoritative={:?}", keys, key);

    // ---------------------------------
    // Step 4: single tracker round trip
    // ---------------------------------
    let ticket = match key {
        Some(k) => {
            let jira = JiraClient::from_config(cfg.tracker.clone())?;
            jira.get_issue(k).await?
        }
        None => None,
    };
    debug!("step4: ticket resolved={}", ticket.is_some());

    // ---------------------------------
    // Step 5: pure decision phase
    // ---------------------------------
    let lint_plan = plan::build_plan(cfg, ctx, key, ticket.as_ref());
    debug!(
        "step5: actions={} verdict={:?}",
        lint_plan.actions.len(),
        lint_plan.verdict
    );

    // ---------------------------------
    // Step 6: idempotent publish
    // ---------------------------------
    let client = GitHubClient::from_token(&cfg.github_base_api, &cfg.github_token)?;
    let mut publisher = Publisher::prepare(client, ctx, cfg.dry_run).await?;

    let mut performed = 0usize;
    let mut skipped = 0usize;
    for action in &lint_plan.actions {
        let out = publisher.apply(action).await?;
        if out.performed {
            performed += 1;
        } else {
            skipped += 1;
        }
    }

    info!(
        "lint done performed={} skipped={} verdict={:?} in {} ms",
        performed,
        skipped,
        lint_plan.verdict,
        t0.elapsed().as_millis()
    );

    Ok(lint_plan.verdict)
}

// -----------------------------------------------------------------------------
// Convenience re-exports for downstream users
// -----------------------------------------------------------------------------

pub use context::PullRequestContext;
pub use errors::{ConfigError, Error, ProviderError};
pub use plan::{Action, LintPlan, Verdict};
pub use tracker::{JiraClient, Ticket, TrackerConfig};
