//! Decision phase of the lint run.
//!
//! `build_plan` walks the outcome state machine over already-fetched
//! inputs and returns the annotations to publish plus the verdict.
//! Keeping this pure means every branch of the flow is testable without
//! a tracker or a code host.

use tracing::debug;

use crate::LintConfig;
use crate::annotations;
use crate::context::PullRequestContext;
use crate::policy;
use crate::tracker::Ticket;

/// A single annotation to apply to the pull request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddLabels(Vec<String>),
    PostComment(String),
    UpdateDescription(String),
}

/// Final outcome of a lint run.
///
/// `Skipped` is the neutral outcome for exempt branches; both `Pass`
/// and `Skipped` map to a zero exit code. `Fail` carries the joined
/// violation messages and maps to exit code 1.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Skipped,
    Fail(String),
}

/// Publishable actions in application order, plus the verdict.
#[derive(Debug, Clone)]
pub struct LintPlan {
    pub actions: Vec<Action>,
    pub verdict: Verdict,
}

/// Builds the plan for a PR whose branch passed the exemption check.
///
/// `key` is the authoritative issue key (`None` when the branch carries
/// none); `ticket` is the tracker lookup result for that key. Policy
/// violations accumulate locally and only surface through the verdict.
pub fn build_plan(
    cfg: &LintConfig,
    ctx: &PullRequestContext,
    key: Option<&str>,
    ticket: Option<&Ticket>,
) -> LintPlan {
    let mut actions = Vec::new();
    let mut violations: Vec<String> = Vec::new();

    let Some(key) = key else {
        actions.push(Action::PostComment(annotations::missing_key_comment(
            &ctx.head_branch,
        )));
        return LintPlan {
            actions,
            verdict: Verdict::Fail("no issue key found in the branch name".to_string()),
        };
    };

    match ticket {
        None => {
            // Same comment as the missing-key case; the key simply does
            // not resolve to a ticket. Labels are skipped, but the rest
            // of the run still accumulates into the verdict.
            actions.push(Action::PostComment(annotations::missing_key_comment(
                &ctx.head_branch,
            )));
            violations.push(format!("issue key {key} does not resolve to a Jira ticket"));
        }
        Some(ticket) => {
            actions.push(Action::AddLabels(annotations::labels_for(
                ticket,
                &ctx.base_branch,
            )));

            if !policy::is_status_allowed(
                cfg.validate_status,
                &cfg.allowed_statuses,
                ticket.status.as_deref(),
            ) {
                let status = ticket.status.as_deref().unwrap_or("");
                actions.push(Action::PostComment(annotations::invalid_status_comment(
                    status,
                    &cfg.allowed_statuses,
                )));
                violations.push(format!("issue status '{status}' is not in the allowed set"));
            }

            if annotations::should_update_description(&ctx.body) {
                actions.push(Action::UpdateDescription(annotations::merge_description(
                    &ctx.body, ticket,
                )));

                if !cfg.skip_comments {
                    let summary = ticket.summary.as_deref().unwrap_or("");
                    actions.push(Action::PostComment(annotations::title_comment(
                        &ctx.title, summary,
                    )));

                    if policy::is_humongous(ctx.additions, cfg.additions_threshold) {
                        actions.push(Action::PostComment(annotations::huge_pr_comment(
                            ctx.additions,
                            cfg.additions_threshold,
                        )));
                    }
                }
            } else {
                debug!("step5: description update opted out");
            }
        }
    }

    let verdict = if violations.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail(violations.join("; "))
    };
    LintPlan { actions, verdict }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DEFAULT_ADDITIONS_THRESHOLD;
    use crate::tracker::TrackerConfig;

    fn test_cfg() -> LintConfig {
        LintConfig {
            tracker: TrackerConfig {
                base_api: "https://jira.example.com".to_string(),
                token: "jira-token".to_string(),
            },
            github_token: "gh-token".to_string(),
            github_base_api: "https://api.github.com".to_string(),
            branch_ignore_pattern: String::new(),
            skip_comments: false,
            additions_threshold: DEFAULT_ADDITIONS_THRESHOLD,
            validate_status: false,
            allowed_statuses: Vec::new(),
            dry_run: false,
        }
    }

    fn test_ctx(head_branch: &str) -> PullRequestContext {
        PullRequestContext {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            number: 42,
            base_branch: "main".to_string(),
            head_branch: head_branch.to_string(),
            title: "Fix the widget".to_string(),
            body: "Existing description.".to_string(),
            additions: 17,
        }
    }

    fn ticket() -> Ticket {
        Ticket {
            key: "ABC-42".to_string(),
            project: Some("Phoenix".to_string()),
            issue_type: Some("Story".to_string()),
            status: Some("Done".to_string()),
            summary: Some("Fix the widget".to_string()),
        }
    }

    fn comment_bodies(plan: &LintPlan) -> Vec<&String> {
        plan.actions
            .iter()
            .filter_map(|a| match a {
                Action::PostComment(body) => Some(body),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn branch_without_key_fails_with_one_comment() {
        let plan = build_plan(&test_cfg(), &test_ctx("feature/foo"), None, None);
        let comments = comment_bodies(&plan);
        assert_eq!(comments.len(), 1);
        assert!(comments[0].contains("`feature/foo`"));
        assert!(matches!(plan.verdict, Verdict::Fail(_)));
        assert!(!plan.actions.iter().any(|a| matches!(a, Action::AddLabels(_))));
    }

    #[test]
    fn unresolved_key_fails_but_still_finalizes() {
        let plan = build_plan(&test_cfg(), &test_ctx("feature/ABC-42-fix"), Some("ABC-42"), None);
        assert_eq!(comment_bodies(&plan).len(), 1);
        assert!(!plan.actions.iter().any(|a| matches!(a, Action::AddLabels(_))));
        match &plan.verdict {
            Verdict::Fail(reason) => assert!(reason.contains("ABC-42")),
            other => panic!("expected Fail, got {other:?}"),
        }
    }

    #[test]
    fn resolved_ticket_with_validation_off_passes() {
        let t = ticket();
        let plan = build_plan(&test_cfg(), &test_ctx("feature/ABC-42-fix"), Some("ABC-42"), Some(&t));
        assert_eq!(plan.verdict, Verdict::Pass);
        assert_eq!(
            plan.actions[0],
            Action::AddLabels(vec!["Phoenix".to_string(), "Story".to_string()])
        );
        assert!(plan
            .actions
            .iter()
            .any(|a| matches!(a, Action::UpdateDescription(_))));
        // Title comment rides along once the description was updated.
        assert!(comment_bodies(&plan).iter().any(|b| b.contains("PR title")));
    }

    #[test]
    fn disallowed_status_fails_and_names_the_status() {
        let mut cfg = test_cfg();
        cfg.validate_status = true;
        cfg.allowed_statuses = vec!["In Progress".to_string()];
        let t = ticket();
        let plan = build_plan(&cfg, &test_ctx("feature/ABC-42-fix"), Some("ABC-42"), Some(&t));
        assert!(comment_bodies(&plan).iter().any(|b| b.contains("**Done**")));
        match &plan.verdict {
            Verdict::Fail(reason) => assert!(reason.contains("Done")),
            other => panic!("expected Fail, got {other:?}"),
        }
        // The violation does not stop the description update.
        assert!(plan
            .actions
            .iter()
            .any(|a| matches!(a, Action::UpdateDescription(_))));
    }

    #[test]
    fn suppressed_comments_keep_labels_and_description() {
        let mut cfg = test_cfg();
        cfg.skip_comments = true;
        let t = ticket();
        let plan = build_plan(&cfg, &test_ctx("feature/ABC-42-fix"), Some("ABC-42"), Some(&t));
        assert_eq!(plan.verdict, Verdict::Pass);
        assert!(comment_bodies(&plan).is_empty());
        assert!(plan
            .actions
            .iter()
            .any(|a| matches!(a, Action::UpdateDescription(_))));
    }

    #[test]
    fn skip_marker_blocks_description_and_trailing_comments() {
        let t = ticket();
        let mut ctx = test_ctx("feature/ABC-42-fix");
        ctx.body = format!("Keep me.\n{}", crate::annotations::SKIP_MARKER);
        let plan = build_plan(&test_cfg(), &ctx, Some("ABC-42"), Some(&t));
        assert_eq!(plan.verdict, Verdict::Pass);
        assert!(!plan
            .actions
            .iter()
            .any(|a| matches!(a, Action::UpdateDescription(_))));
        assert!(comment_bodies(&plan).is_empty());
    }

    #[test]
    fn huge_pr_gets_the_size_comment() {
        let t = ticket();
        let mut ctx = test_ctx("feature/ABC-42-fix");
        ctx.additions = 900;
        let plan = build_plan(&test_cfg(), &ctx, Some("ABC-42"), Some(&t));
        assert!(comment_bodies(&plan).iter().any(|b| b.contains("900")));
    }
}
