//! Normalized ticket record produced by the tracker adapter.

use serde::{Deserialize, Serialize};

/// Ticket metadata used for labels, the description block and policy
/// checks.
///
/// Inner fields stay optional; absent values render as empty strings
/// downstream. A ticket that does not exist at all is `None` at the
/// client boundary, never a record with an empty key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub key: String,
    pub project: Option<String>,
    pub issue_type: Option<String>,
    pub status: Option<String>,
    pub summary: Option<String>,
}
