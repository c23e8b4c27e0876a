//! Tracker adapter: configuration, normalized ticket record, Jira client.
//!
//! Laid out as a thin provider layer: the orchestrator hands in a
//! [`TrackerConfig`], gets back normalized [`Ticket`] records, and never
//! sees tracker wire shapes or authentication details.

pub mod types;
pub use types::*;

pub mod jira;
pub use jira::JiraClient;

/// Runtime configuration for the tracker client.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// API base, e.g. "https://your-org.atlassian.net"
    pub base_api: String,
    /// Access token, sent as a Basic authorization credential.
    pub token: String,
}
