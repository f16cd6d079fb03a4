pub mod collector;
pub mod exporter;

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

pub use collector::MetricsCollector;
pub use exporter::export_metrics;

lazy_static! {
    pub(crate) static ref WAF_REQUESTS_INSPECTED: IntCounter = register_int_counter!(
        "waf_requests_inspected_total",
        "Requests inspected by the WAF"
    )
    .expect("waf_requests_inspected_total registers once");

    pub(crate) static ref WAF_REQUESTS_BLOCKED: IntCounterVec = register_int_counter_vec!(
        "waf_requests_blocked_total",
        "Requests blocked by the WAF, by rule id",
        &["rule_id"]
    )
    .expect("waf_requests_blocked_total registers once");
}
