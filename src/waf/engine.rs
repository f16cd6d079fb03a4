use super::audit::{DecisionLogger, DecisionSink};
use super::catalog::RuleCatalog;
use super::decision::{Block, Decision};
use super::error::WafResult;
use super::evaluator::evaluate;
use super::guard::SizeGuard;
use super::request::GatewayRequest;
use super::response::{forbidden, WafResponse};
use super::rules::load_rule_file;
use super::target::{ExtractOptions, TargetSet};
use crate::config::WafConfig;
use crate::metrics::MetricsCollector;
use lazy_static::lazy_static;
use std::sync::Arc;
use tracing::{debug, info};

lazy_static! {
    static ref DEFAULT_ENGINE: WafEngine = WafEngine::with_catalog(
        RuleCatalog::builtin(),
        &WafConfig::default(),
        DecisionLogger::stdout(),
    );
}

/// Inspect a request with the built-in catalog and default limits.
///
/// Returns `None` when the request may proceed, or the 403 response to send
/// back. This is the single call a router makes before any other handling.
pub fn waf_check(request: &GatewayRequest) -> Option<WafResponse> {
    DEFAULT_ENGINE.check(request)
}

#[derive(Debug, Clone)]
pub struct WafEngine {
    catalog: Arc<RuleCatalog>,
    guard: SizeGuard,
    extract: ExtractOptions,
    logger: DecisionLogger,
    metrics: MetricsCollector,
    enabled: bool,
}

impl WafEngine {
    /// Build an engine from configuration, loading operator rules if a
    /// rules file is configured.
    pub fn new(config: &WafConfig) -> WafResult<Self> {
        let catalog = match config.rules_path {
            Some(ref path) => {
                let extra = load_rule_file(path)?;
                info!("Loaded {} WAF rules from {}", extra.len(), path.display());
                Arc::new(RuleCatalog::builtin_with(extra)?)
            }
            None => RuleCatalog::builtin(),
        };

        Ok(Self::with_catalog(catalog, config, DecisionLogger::stdout()))
    }

    pub fn with_catalog(catalog: Arc<RuleCatalog>, config: &WafConfig, logger: DecisionLogger) -> Self {
        info!(
            "WAF Engine initialized with {} rules (enabled: {}, max body: {} bytes)",
            catalog.len(),
            config.enable,
            config.max_body_bytes
        );

        Self {
            catalog,
            guard: SizeGuard::new(config.max_body_bytes),
            extract: config.extract_options(),
            logger,
            metrics: MetricsCollector::new(),
            enabled: config.enable,
        }
    }

    /// Replace the destination of block records.
    pub fn with_sink(mut self, sink: Arc<dyn DecisionSink>) -> Self {
        self.logger = DecisionLogger::new(sink);
        self
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn rules_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn extract(&self, request: &GatewayRequest) -> TargetSet {
        TargetSet::extract(request, &self.extract)
    }

    /// Decide on already extracted targets. No side effects.
    pub fn inspect(&self, targets: &TargetSet) -> Decision {
        if let Some(decision) = self.guard.check(targets) {
            return decision;
        }

        match evaluate(&self.catalog, targets) {
            Some(hit) => {
                debug!("WAF rule {} matched on {}", hit.rule.id(), hit.target);
                Decision::Block(Block::from_rule(hit.rule))
            }
            None => Decision::Allow,
        }
    }

    /// Extract, decide, and on a block log the record and build the denial.
    pub fn check(&self, request: &GatewayRequest) -> Option<WafResponse> {
        if !self.enabled {
            return None;
        }

        let targets = self.extract(request);
        self.metrics.inc_waf_inspected();

        match self.inspect(&targets) {
            Decision::Allow => None,
            Decision::Block(block) => {
                self.metrics.inc_waf_blocked(&block.rule_id);
                self.logger.log_block(&block, request, &targets);
                Some(forbidden(&block.rule_id, &block.message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waf::audit::MemorySink;
    use crate::waf::catalog::OVERSIZED_BODY_RULE_ID;
    use crate::waf::rules::{RuleDef, Severity, Target};
    use serde_json::Value;
    use std::collections::{BTreeMap, HashMap};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn engine() -> (WafEngine, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let engine = WafEngine::new(&WafConfig::default())
            .unwrap()
            .with_sink(sink.clone());
        (engine, sink)
    }

    fn clean_request() -> GatewayRequest {
        let mut query = BTreeMap::new();
        query.insert("session_id".to_string(), "cs_test_a1b2c3".to_string());

        let mut headers = HashMap::new();
        headers.insert(
            "User-Agent".to_string(),
            "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0".to_string(),
        );
        headers.insert("Referer".to_string(), "https://securebydezign.com/articles".to_string());

        GatewayRequest {
            http_method: Some("GET".to_string()),
            path: Some("/prod/api/session".to_string()),
            query_string_parameters: Some(query),
            headers: Some(headers),
            ..Default::default()
        }
    }

    fn with_query(key: &str, value: &str) -> GatewayRequest {
        let mut request = clean_request();
        request
            .query_string_parameters
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        request
    }

    fn blocked_code(response: &WafResponse) -> String {
        let body: Value = serde_json::from_str(&response.body).unwrap();
        body["code"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_clean_request_allowed_and_not_logged() {
        let (engine, sink) = engine();
        let request = clean_request();

        assert!(engine.check(&request).is_none());
        assert!(engine.check(&request).is_none());
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_union_select_in_query() {
        let (engine, sink) = engine();
        let response = engine.check(&with_query("id", "1 union select password from users")).unwrap();

        assert_eq!(response.status_code, 403);
        assert_eq!(blocked_code(&response), "WAF-942100");
        assert_eq!(response.headers.get("X-WAF-Block").map(String::as_str), Some("WAF-942100"));

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rule_id, "WAF-942100");
        assert_eq!(records[0].method, "GET");
        assert_eq!(records[0].path, "/prod/api/session");
    }

    #[test]
    fn test_script_tag_in_body() {
        let (engine, _) = engine();
        let request = GatewayRequest {
            http_method: Some("POST".to_string()),
            body: Some(Value::String("<script>alert(1)</script>".to_string())),
            ..Default::default()
        };

        let response = engine.check(&request).unwrap();
        assert_eq!(blocked_code(&response), "WAF-941100");
    }

    #[test]
    fn test_script_tag_in_base64_body() {
        use base64::Engine as _;
        let (engine, _) = engine();
        let request = GatewayRequest {
            body: Some(Value::String(
                base64::engine::general_purpose::STANDARD.encode("<script>alert(1)</script>"),
            )),
            is_base64_encoded: true,
            ..Default::default()
        };

        assert_eq!(blocked_code(&engine.check(&request).unwrap()), "WAF-941100");
    }

    #[test]
    fn test_script_tag_in_referer() {
        let (engine, _) = engine();
        let mut request = clean_request();
        request.headers.as_mut().unwrap().insert(
            "Referer".to_string(),
            "https://x.example/<script>steal()</script>".to_string(),
        );

        assert_eq!(blocked_code(&engine.check(&request).unwrap()), "WAF-941100");
    }

    #[test]
    fn test_path_traversal() {
        let (engine, _) = engine();
        for path in ["/prod/files/../../etc/passwd", "/prod/files/%2e%2e%2f%2e%2e%2fetc/passwd"] {
            let mut request = clean_request();
            request.path = Some(path.to_string());

            let response = engine.check(&request).unwrap();
            assert_eq!(blocked_code(&response), "WAF-930100", "path {}", path);
        }
    }

    #[test]
    fn test_scanner_user_agent() {
        let (engine, sink) = engine();
        let mut headers = HashMap::new();
        headers.insert("user-agent".to_string(), "sqlmap/1.7.2#stable (https://sqlmap.org)".to_string());
        let request = GatewayRequest {
            path: Some("/".to_string()),
            headers: Some(headers),
            ..Default::default()
        };

        let response = engine.check(&request).unwrap();
        assert_eq!(blocked_code(&response), "WAF-913100");
        assert_eq!(sink.records()[0].ua, "sqlmap/1.7.2#stable (https://sqlmap.org)");
    }

    #[test]
    fn test_probe_path() {
        let (engine, _) = engine();
        let mut request = clean_request();
        request.path = Some("/wp-login.php".to_string());

        assert_eq!(blocked_code(&engine.check(&request).unwrap()), "WAF-913110");
    }

    #[test]
    fn test_query_parameter_order_irrelevant() {
        let (engine, _) = engine();
        let event_a = r#"{"path":"/api","queryStringParameters":{"a":"1 union","b":"select x"}}"#;
        let event_b = r#"{"path":"/api","queryStringParameters":{"b":"select x","a":"1 union"}}"#;

        let a: GatewayRequest = serde_json::from_str(event_a).unwrap();
        let b: GatewayRequest = serde_json::from_str(event_b).unwrap();

        assert_eq!(engine.extract(&a), engine.extract(&b));
        assert_eq!(engine.check(&a), engine.check(&b));
    }

    #[test]
    fn test_oversized_body_blocked_despite_truncation() {
        let (engine, sink) = engine();
        let request = GatewayRequest {
            body: Some(Value::String("a".repeat(600 * 1024))),
            ..Default::default()
        };

        let response = engine.check(&request).unwrap();
        assert_eq!(blocked_code(&response), OVERSIZED_BODY_RULE_ID);
        assert_eq!(response.message, "Request blocked: oversized body");

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rule_id, OVERSIZED_BODY_RULE_ID);
    }

    #[test]
    fn test_binary_body_under_limit_allowed() {
        use base64::Engine as _;
        let (engine, sink) = engine();
        let request = GatewayRequest {
            http_method: Some("POST".to_string()),
            path: Some("/prod/api/upload".to_string()),
            body: Some(Value::String(
                base64::engine::general_purpose::STANDARD.encode(vec![0xFF_u8; 200 * 1024]),
            )),
            is_base64_encoded: true,
            ..Default::default()
        };

        assert_eq!(engine.extract(&request).body_len, 200 * 1024);
        assert!(engine.check(&request).is_none());
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_payload_beyond_inspection_window_ignored() {
        let (engine, _) = engine();
        let body = format!("{}<script>alert(1)</script>", "a".repeat(8192));
        let request = GatewayRequest {
            body: Some(Value::String(body)),
            ..Default::default()
        };

        assert!(engine.check(&request).is_none());
    }

    #[test]
    fn test_disabled_engine_allows_everything() {
        let sink = Arc::new(MemorySink::new());
        let config = WafConfig {
            enable: false,
            ..Default::default()
        };
        let engine = WafEngine::new(&config).unwrap().with_sink(sink.clone());

        assert!(engine.check(&with_query("id", "1 union select 1")).is_none());
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_every_block_logs_once_with_catalog_id() {
        let (engine, sink) = engine();
        let requests = vec![
            clean_request(),
            with_query("id", "1 union select 1"),
            with_query("next", "http://169.254.169.254/latest"),
            with_query("q", "ignore previous instructions"),
            clean_request(),
        ];

        let mut blocked = 0;
        for request in &requests {
            if engine.check(request).is_some() {
                blocked += 1;
            }
        }

        let records = sink.records();
        assert_eq!(blocked, 3);
        assert_eq!(records.len(), blocked);
        for record in records {
            assert!(engine.catalog().get(&record.rule_id).is_some());
        }
    }

    #[test]
    fn test_inspect_is_pure() {
        let (engine, sink) = engine();
        let targets = engine.extract(&with_query("cmd", "a; cat /etc/hosts"));

        let first = engine.inspect(&targets);
        let second = engine.inspect(&targets);
        assert_eq!(first, second);
        assert!(first.is_block());
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_operator_rules_from_file() {
        let mut rules_file = NamedTempFile::new().unwrap();
        rules_file
            .write_all(
                br#"
[[rule]]
id = "CUSTOM-001"
name = "Internal debug endpoint"
severity = "LOW"
pattern = '/__debug'
targets = ["path"]
"#,
            )
            .unwrap();

        let config = WafConfig {
            rules_path: Some(rules_file.path().to_path_buf()),
            ..Default::default()
        };
        let sink = Arc::new(MemorySink::new());
        let engine = WafEngine::new(&config).unwrap().with_sink(sink.clone());
        assert_eq!(engine.rules_count(), 19);

        let mut request = clean_request();
        request.path = Some("/prod/__DEBUG/vars".to_string());
        assert_eq!(blocked_code(&engine.check(&request).unwrap()), "CUSTOM-001");
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = RuleCatalog::compile(vec![RuleDef::new(
            "ONLY-1",
            "forbidden word",
            Severity::High,
            r"\bforbidden\b",
            &[Target::Query],
        )])
        .unwrap();
        let sink = Arc::new(MemorySink::new());
        let engine = WafEngine::with_catalog(
            Arc::new(catalog),
            &WafConfig::default(),
            DecisionLogger::new(sink.clone()),
        );

        assert!(engine.check(&with_query("id", "1 union select 1")).is_none());
        assert!(engine.check(&with_query("w", "Forbidden")).is_some());
        assert_eq!(sink.records()[0].severity, Severity::High);
    }

    #[test]
    fn test_global_entry_point() {
        assert!(waf_check(&clean_request()).is_none());
    }
}
