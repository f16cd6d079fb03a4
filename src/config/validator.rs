use super::Config;
use super::HeaderScope;
use anyhow::Result;

pub fn validate_config(config: &Config) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if !config.waf.enable {
        warnings.push("[!] WAF is disabled. Every request will be allowed.".to_string());
    }

    if config.waf.inspect_body_bytes == 0 {
        warnings.push("[X] inspect_body_bytes is 0. Body rules will never match.".to_string());
    }

    if config.waf.max_body_bytes == 0 {
        warnings.push("[X] max_body_bytes is 0. Every request with a body will be blocked.".to_string());
    }

    if config.waf.inspect_body_bytes > config.waf.max_body_bytes {
        warnings.push(format!(
            "[!] inspect_body_bytes ({}) exceeds max_body_bytes ({}). The extra bytes are never inspected.",
            config.waf.inspect_body_bytes, config.waf.max_body_bytes
        ));
    }

    if let Some(ref rules_path) = config.waf.rules_path {
        if !rules_path.exists() {
            warnings.push(format!(
                "[X] WAF rules file not found: {}",
                rules_path.display()
            ));
        }
    }

    if config.waf.header_scope == HeaderScope::All {
        warnings.push(
            "[*] header_scope = \"all\" exposes every header to header rules. Expect more false positives.".to_string()
        );
    }

    if !["trace", "debug", "info", "warn", "error"].contains(&config.logging.level.as_str()) {
        warnings.push(format!(
            "[X] Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            config.logging.level
        ));
    }

    if !["json", "pretty", "text"].contains(&config.logging.format.as_str()) {
        warnings.push(format!(
            "[X] Invalid log format: {}. Must be 'json', 'pretty' or 'text'",
            config.logging.format
        ));
    }

    if config.logging.level == "debug" || config.logging.level == "trace" {
        warnings.push(
            "[*] Recommendation: Use 'info' or 'warn' log level in production".to_string()
        );
    }

    Ok(warnings)
}
