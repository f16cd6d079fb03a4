use super::*;

#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector;

impl MetricsCollector {
    pub fn new() -> Self {
        Self
    }

    pub fn inc_waf_inspected(&self) {
        WAF_REQUESTS_INSPECTED.inc();
    }

    pub fn inc_waf_blocked(&self, rule_id: &str) {
        WAF_REQUESTS_BLOCKED.with_label_values(&[rule_id]).inc();
    }

    pub fn waf_inspected_total(&self) -> u64 {
        WAF_REQUESTS_INSPECTED.get()
    }

    pub fn waf_blocked_total(&self, rule_id: &str) -> u64 {
        WAF_REQUESTS_BLOCKED.with_label_values(&[rule_id]).get()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
