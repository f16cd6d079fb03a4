use crate::waf::rules::Severity;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Characters of query string kept in a block record.
pub const MAX_LOGGED_QUERY_CHARS: usize = 512;

/// Characters of user agent kept in a block record.
pub const MAX_LOGGED_UA_CHARS: usize = 256;

/// Audit record for one blocked request. Field names are consumed by log
/// pipelines and must not change.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockLog {
    pub waf: bool,
    pub action: String,
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub method: String,
    pub path: String,
    pub query: String,
    pub ip: String,
    pub ua: String,
    /// RFC 3339, UTC, millisecond precision.
    #[serde(rename = "ts")]
    pub timestamp: String,
}

impl BlockLog {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rule_id: String,
        rule_name: String,
        severity: Severity,
        method: String,
        path: String,
        query: &str,
        ip: String,
        ua: &str,
    ) -> Self {
        Self {
            waf: true,
            action: "BLOCK".to_string(),
            rule_id,
            rule_name,
            severity,
            method,
            path,
            query: truncate_chars(query, MAX_LOGGED_QUERY_CHARS),
            ip,
            ua: truncate_chars(ua, MAX_LOGGED_UA_CHARS),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
