use super::catalog::RuleCatalog;
use super::rules::{Rule, Target};
use super::target::TargetSet;

/// The first rule that fired and the field it fired on.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'a> {
    pub rule: &'a Rule,
    pub target: Target,
}

/// Try rules in catalog order and each rule's targets in declared order.
/// Empty fields are skipped; the first hit ends evaluation.
pub fn evaluate<'a>(catalog: &'a RuleCatalog, targets: &TargetSet) -> Option<RuleMatch<'a>> {
    catalog.iter().find_map(|rule| {
        rule.targets()
            .iter()
            .copied()
            .find(|&target| {
                let value = targets.get(target);
                !value.is_empty() && rule.matches(value)
            })
            .map(|target| RuleMatch { rule, target })
    })
}
