//! Annotation composition: labels, comment bodies, description block.
//!
//! Everything here renders deterministic text. Comment deduplication is
//! an exact-text match against previously posted bodies, so output must
//! stay stable across runs (no timestamps, no unordered iteration).

use std::collections::HashSet;

use crate::policy;
use crate::tracker::Ticket;

/// Delimits the generated details block inside a PR description.
pub const DETAILS_START: &str = "<!-- pr-lint:details:start -->";
pub const DETAILS_END: &str = "<!-- pr-lint:details:end -->";

/// PR authors opt out of description rewriting with this marker.
pub const SKIP_MARKER: &str = "<!-- pr-lint:skip -->";

/// Label set for a resolved ticket: project name, hotfix marker for
/// release targets, issue type. Blanks and duplicates are dropped,
/// order is preserved.
pub fn labels_for(ticket: &Ticket, base_branch: &str) -> Vec<String> {
    let candidates = [
        ticket.project.clone().unwrap_or_default(),
        policy::hotfix_label(base_branch).unwrap_or_default().to_string(),
        ticket.issue_type.clone().unwrap_or_default(),
    ];
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .filter(|l| seen.insert(l.clone()))
        .collect()
}

/// Also used when a key is present but resolves to no ticket.
pub fn missing_key_comment(head_branch: &str) -> String {
    format!(
        "A Jira issue key could not be resolved from the branch `{head_branch}`.\n\n\
         Branch names must contain a valid issue key, e.g. \
         `feature/ABC-123-short-description`, so the pull request can be \
         linked to its ticket. Rename the branch to include the key."
    )
}

pub fn invalid_status_comment(status: &str, allowed: &[String]) -> String {
    format!(
        "The linked issue is in status **{status}**, which is not accepted \
         for merging.\n\nAccepted statuses: {}.",
        allowed.join(", ")
    )
}

/// Informational only; posted whenever a ticket resolves and the
/// description was updated, whether or not the title actually differs.
pub fn title_comment(title: &str, summary: &str) -> String {
    format!(
        "PR title: {title}\nIssue summary: {summary}\n\n\
         Please check that the title matches the linked ticket."
    )
}

pub fn huge_pr_comment(additions: u32, threshold: u32) -> String {
    format!(
        "This pull request adds {additions} lines, above the configured \
         limit of {threshold}. Consider splitting it into smaller pull \
         requests."
    )
}

pub fn branches_missing_comment() -> String {
    "The head and base branches of this pull request could not be \
     determined; lint checks cannot run."
        .to_string()
}

/// False when the author opted out with the skip marker.
pub fn should_update_description(body: &str) -> bool {
    !body.contains(SKIP_MARKER)
}

/// Prepends the ticket details block, replacing any block left by a
/// previous run. Re-running on the merged output is a no-op.
pub fn merge_description(body: &str, ticket: &Ticket) -> String {
    let details = details_block(ticket);
    let rest = strip_details_block(body);
    if rest.is_empty() {
        details
    } else {
        format!("{details}\n\n{rest}")
    }
}

fn details_block(ticket: &Ticket) -> String {
    let project = ticket.project.as_deref().unwrap_or("");
    let issue_type = ticket.issue_type.as_deref().unwrap_or("");
    let summary = ticket.summary.as_deref().unwrap_or("");
    format!(
        "{DETAILS_START}\n\
         | Key | Project | Type | Summary |\n\
         | --- | --- | --- | --- |\n\
         | {key} | {project} | {issue_type} | {summary} |\n\
         {DETAILS_END}",
        key = ticket.key,
    )
}

/// Removes a previously inserted block. Both markers must be present; a
/// hand-mangled half-marker body is left as-is and the fresh block is
/// simply prepended.
fn strip_details_block(body: &str) -> String {
    let (Some(start), Some(end_idx)) = (body.find(DETAILS_START), body.find(DETAILS_END)) else {
        return body.trim().to_string();
    };
    if end_idx < start {
        return body.trim().to_string();
    }
    let end = end_idx + DETAILS_END.len();
    format!("{}{}", &body[..start], &body[end..])
        .trim()
        .to_string()
}
