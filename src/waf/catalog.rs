use super::error::{WafError, WafResult};
use super::rules::{Rule, RuleDef, Severity, Target};
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Id used for blocks raised by the body size guard rather than a pattern.
pub const OVERSIZED_BODY_RULE_ID: &str = "WAF-920100";
pub const OVERSIZED_BODY_RULE_NAME: &str = "Oversized request body";

lazy_static! {
    static ref BUILTIN: Arc<RuleCatalog> = Arc::new(
        RuleCatalog::compile(default_rules()).expect("built-in WAF rules must compile")
    );
}

/// Ordered, immutable set of compiled rules.
#[derive(Debug)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Compile definitions in order. Fails on the first bad pattern, on an
    /// empty target list, on a repeated id or on a reserved id.
    pub fn compile<I>(defs: I) -> WafResult<Self>
    where
        I: IntoIterator<Item = RuleDef>,
    {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();

        for def in defs {
            if def.id == OVERSIZED_BODY_RULE_ID {
                return Err(WafError::ReservedRuleId(def.id));
            }
            if !seen.insert(def.id.clone()) {
                return Err(WafError::DuplicateRuleId(def.id));
            }
            rules.push(Rule::compile(def)?);
        }

        debug!("Compiled WAF catalog with {} rules", rules.len());
        Ok(Self { rules })
    }

    /// The built-in catalog, compiled once per process and shared.
    pub fn builtin() -> Arc<RuleCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Built-in rules followed by operator rules.
    pub fn builtin_with(extra: Vec<RuleDef>) -> WafResult<Self> {
        Self::compile(default_rules().into_iter().chain(extra))
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleCatalog {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// OWASP Core Rule Set inspired signatures, grouped by attack class.
// Order matters: evaluation stops at the first matching rule.
pub fn default_rules() -> Vec<RuleDef> {
    use Severity::*;
    use Target::*;

    vec![
        // SQL injection (942xxx)
        RuleDef::new(
            "WAF-942100",
            "SQL Injection - UNION/SELECT keywords",
            Critical,
            r"((?-u:\b)union(?-u:\b).{0,50}(?-u:\b)select(?-u:\b)|(?-u:\b)select(?-u:\b).{0,50}(?-u:\b)from(?-u:\b)|(?-u:\b)insert(?-u:\b).{0,50}(?-u:\b)into(?-u:\b)|(?-u:\b)delete(?-u:\b).{0,50}(?-u:\b)from(?-u:\b)|(?-u:\b)drop(?-u:\b).{0,20}(?-u:\b)table(?-u:\b)|(?-u:\b)drop(?-u:\b).{0,20}(?-u:\b)database(?-u:\b))",
            &[Query, Body],
        ),
        RuleDef::new(
            "WAF-942200",
            "SQL Injection - comment sequences and stacked queries",
            High,
            r"(--|#\s|/\*|\*/|;\s*(select|insert|update|delete|drop|exec))",
            &[Query, Body],
        ),
        RuleDef::new(
            "WAF-942300",
            "SQL Injection - Boolean-based blind",
            Medium,
            r#"((?-u:\b)(or|and)(?-u:\b)\s+(?-u:[\w'"])+\s*=\s*(?-u:[\w'"])+\s*(--|#|/\*|$)|(?-u:\b)(or|and)(?-u:\b)\s+[0-9]+\s*[<>=!]+\s*[0-9]+)"#,
            &[Query, Body],
        ),
        RuleDef::new(
            "WAF-942400",
            "SQL Injection - common tautologies",
            High,
            r"'\s*(or|and)\s*'?(?-u:\w)+\s*'?\s*=\s*'?(?-u:\w)+'?|'\s*or\s*1\s*=\s*1",
            &[Query, Body],
        ),
        // Cross-site scripting (941xxx)
        RuleDef::new(
            "WAF-941100",
            "XSS - script tag injection",
            High,
            r"<\s*script[\s>/]|</\s*script\s*>",
            &[Query, Body, Headers],
        ),
        RuleDef::new(
            "WAF-941110",
            "XSS - event handler injection",
            High,
            r#"(?-u:\b)on(?-u:\w)+\s*=\s*["']?[^"'\s>]+|javascript\s*:"#,
            &[Query, Body],
        ),
        RuleDef::new(
            "WAF-941120",
            "XSS - iframe/object/embed injection",
            High,
            r"<\s*(iframe|object|embed|applet|form|base|link|meta)(?-u:\b)",
            &[Query, Body],
        ),
        RuleDef::new(
            "WAF-941130",
            "XSS - expression/eval injection",
            Medium,
            r"(expression\s*\(|eval\s*\(|document\.(cookie|write|location)|window\.(location|open)|alert\s*\()",
            &[Query, Body],
        ),
        // Path traversal (930xxx)
        RuleDef::new(
            "WAF-930100",
            "Path Traversal - dot-dot sequences",
            High,
            r"(\.\.[/\\]|%2e%2e[%/\\]|%252e%252e|\.\.%2f|\.\.%5c)",
            &[Path, Query],
        ),
        RuleDef::new(
            "WAF-930110",
            "Path Traversal - absolute path access",
            Medium,
            r"(/etc/passwd|/etc/shadow|/proc/|/sys/|/windows/system|c:\\windows|c:\\program)",
            &[Path, Query, Body],
        ),
        // Command injection (932xxx)
        RuleDef::new(
            "WAF-932100",
            "Command Injection - shell metacharacters + commands",
            Critical,
            r"(\|\||&&|;\s*(ls|cat|wget|curl|chmod|chown|rm|mv|cp|nc|bash|sh|python|perl|php|ruby|node)|`[^`]*`|\$\([^)]*\))",
            &[Query, Body],
        ),
        RuleDef::new(
            "WAF-932110",
            "Command Injection - Windows cmd",
            High,
            r"(cmd\.exe|powershell|net\s+user|net\s+localgroup|whoami|systeminfo|ipconfig|netstat)",
            &[Query, Body],
        ),
        // SSRF and cloud metadata probes (934xxx)
        RuleDef::new(
            "WAF-934100",
            "SSRF - cloud metadata endpoint probe",
            Critical,
            r"(169\.254\.169\.254|fd00:ec2:|metadata\.google\.internal|169\.254\.170\.2)",
            &[Query, Body],
        ),
        RuleDef::new(
            "WAF-934110",
            "SSRF - internal network targeting",
            High,
            r"(localhost|127\.[0-9]+\.[0-9]+\.[0-9]+|0\.0\.0\.0|::1|10\.[0-9]+\.[0-9]+\.[0-9]+|172\.(1[6-9]|2[0-9]|3[01])\.[0-9]+\.[0-9]+|192\.168\.[0-9]+\.[0-9]+)",
            &[Query, Body],
        ),
        // Prompt injection
        RuleDef::new(
            "WAF-960100",
            "Prompt Injection - instruction override patterns",
            Medium,
            r"(ignore\s+(all\s+)?(previous|prior|above)\s+instructions?|disregard\s+(your|the|all)\s+(previous|prior|system)|forget\s+(everything|all|your)\s+(you('ve)?\s+)?learned|you\s+are\s+now\s+DAN|act\s+as\s+(if\s+you\s+have\s+no|an?\s+unfiltered)|jailbreak|prompt\s+injection)",
            &[Query, Body],
        ),
        // Scanner and exploit tool fingerprints (913xxx)
        RuleDef::new(
            "WAF-913100",
            "Scanner - known attack tool user agents",
            Medium,
            r"(sqlmap|nikto|nessus|openvas|masscan|nuclei|acunetix|netsparker|dirbuster|gobuster|ffuf|wfuzz|hydra|medusa|metasploit|burpsuite|havij|zaproxy|w3af|skipfish|wpscan|joomscan)",
            &[UserAgent],
        ),
        RuleDef::new(
            "WAF-913110",
            "Scanner - common path probe signatures",
            Low,
            r"(wp-login|wp-admin|wp-config|phpmyadmin|\.env|\.git/config|\.htaccess|admin\.php|shell\.php|eval\.php|xmlrpc\.php|cgi-bin|config\.xml|web\.config|appsettings\.json|\.aws/credentials)",
            &[Path],
        ),
        RuleDef::new(
            "WAF-913120",
            "Scanner - LFI/RFI probe patterns",
            High,
            r"(php://filter|php://input|expect://|data://|zip://|phar://|file://|=http://|=https://.*\.(php|pl|py|sh|asp|aspx))",
            &[Query, Body],
        ),
    ]
}
