use super::rules::{Rule, Severity};
use serde::Serialize;

/// Outcome of inspecting one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "UPPERCASE")]
pub enum Decision {
    Allow,
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub message: String,
}

impl Block {
    pub fn from_rule(rule: &Rule) -> Self {
        Self {
            rule_id: rule.id().to_string(),
            rule_name: rule.name().to_string(),
            severity: rule.severity(),
            message: format!("Request blocked by {}: {}", rule.id(), rule.name()),
        }
    }
}

impl Decision {
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }

    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Block(block) => Some(&block.rule_id),
        }
    }
}
