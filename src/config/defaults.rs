//! Default values for configuration options

use crate::waf::guard::DEFAULT_MAX_BODY_BYTES;
use crate::waf::target::DEFAULT_INSPECT_BODY_BYTES;

// WAF defaults
pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

pub(super) fn default_inspect_body_bytes() -> usize {
    DEFAULT_INSPECT_BODY_BYTES
}

// Logging defaults
pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_log_format() -> String {
    "json".to_string()
}
