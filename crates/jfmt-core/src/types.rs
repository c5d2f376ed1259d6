use crate::hash::Digest;
use serde::{Deserialize, Serialize};

/// Most entries the history keeps; older ones are evicted.
pub const HISTORY_CAPACITY: usize = 20;

/// Storage key of the history list.
pub const HISTORY_KEY: &str = "history";

/// Storage key of the last editor buffer.
pub const LAST_CONTENT_KEY: &str = "lastContent";

/// One formatted or compressed result kept in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub digest: Digest,
    pub content: String,
    /// RFC 3339, UTC. Refreshed when identical content is recorded again.
    pub created_at: String,
}

/// Format a timestamp as RFC 3339.
pub fn rfc3339(at: time::OffsetDateTime) -> String {
    at.format(&time::format_description::well_known::Rfc3339)
        .expect("RFC3339 formatting should not fail")
}
