use super::catalog::{OVERSIZED_BODY_RULE_ID, OVERSIZED_BODY_RULE_NAME};
use super::decision::{Block, Decision};
use super::rules::Severity;
use super::target::TargetSet;

/// Largest body accepted before pattern matching, in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 512 * 1024;

/// Rejects oversized bodies ahead of the pattern rules.
///
/// The limit is compared with the body length before inspection
/// truncation, so it stays effective when the inspected prefix is smaller
/// than the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeGuard {
    max_body_bytes: usize,
}

impl SizeGuard {
    pub fn new(max_body_bytes: usize) -> Self {
        Self { max_body_bytes }
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn check(&self, targets: &TargetSet) -> Option<Decision> {
        if targets.body_len <= self.max_body_bytes {
            return None;
        }

        Some(Decision::Block(Block {
            rule_id: OVERSIZED_BODY_RULE_ID.to_string(),
            rule_name: OVERSIZED_BODY_RULE_NAME.to_string(),
            severity: Severity::High,
            message: "Request blocked: oversized body".to_string(),
        }))
    }
}

impl Default for SizeGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BODY_BYTES)
    }
}
