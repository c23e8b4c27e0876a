//! Branch name inspection: issue-key extraction and lint exemption.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{ConfigError, LintResult};

lazy_static! {
    /// Tracker project keys: uppercase alphanumeric prefix starting
    /// with a letter, a dash, then the issue number.
    static ref ISSUE_KEY_RE: Regex = Regex::new(r"[A-Z][A-Z0-9]+-\d+").unwrap();
}

/// Every issue key in the branch name, left to right (non-overlapping).
pub fn extract_issue_keys(branch: &str) -> Vec<String> {
    ISSUE_KEY_RE
        .find_iter(branch)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The authoritative key is the match closest to the end of the branch
/// name; suffixes are the more specific convention.
pub fn authoritative_key(keys: &[String]) -> Option<&str> {
    keys.last().map(|k| k.as_str())
}

/// Branches matching the caller-supplied pattern are exempt from
/// linting. An empty pattern never matches.
pub fn should_skip_lint(branch: &str, ignore_pattern: &str) -> LintResult<bool> {
    if ignore_pattern.is_empty() {
        return Ok(false);
    }
    let re = Regex::new(ignore_pattern)
        .map_err(|_| ConfigError::InvalidIgnorePattern(ignore_pattern.to_string()))?;
    Ok(re.is_match(branch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_keys_in_order_and_picks_the_last() {
        let keys = extract_issue_keys("feature/AB-1-port-of-ABC-123");
        assert_eq!(keys, vec!["AB-1".to_string(), "ABC-123".to_string()]);
        assert_eq!(authoritative_key(&keys), Some("ABC-123"));
    }

    #[test]
    fn plain_branch_has_no_keys() {
        assert!(extract_issue_keys("feature/foo").is_empty());
        assert_eq!(authoritative_key(&[]), None);
    }

    #[test]
    fn lowercase_prefixes_are_not_keys() {
        assert!(extract_issue_keys("feature/abc-123-tidy").is_empty());
    }

    #[test]
    fn key_is_found_mid_branch() {
        let keys = extract_issue_keys("hotfix/ABC-42-rollback");
        assert_eq!(keys, vec!["ABC-42".to_string()]);
    }

    #[test]
    fn empty_pattern_never_skips() {
        assert!(!should_skip_lint("main", "").unwrap());
        assert!(!should_skip_lint("release/2024.5", "").unwrap());
    }

    #[test]
    fn matching_branches_are_exempt() {
        let pattern = "^(main|release/.*)$";
        assert!(should_skip_lint("release/2024.5", pattern).unwrap());
        assert!(should_skip_lint("main", pattern).unwrap());
        assert!(!should_skip_lint("feature/ABC-1", pattern).unwrap());
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        assert!(should_skip_lint("main", "(").is_err());
    }
}
