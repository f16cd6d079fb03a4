use super::error::{WafError, WafResult};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Compiled program size cap per pattern.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Lazy DFA cache cap per pattern.
const REGEX_DFA_SIZE_LIMIT: usize = 2 * (1 << 20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Request field a rule is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Query,
    Body,
    Path,
    UserAgent,
    Headers,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
            Self::Path => write!(f, "path"),
            Self::UserAgent => write!(f, "useragent"),
            Self::Headers => write!(f, "headers"),
        }
    }
}

/// Serializable rule definition, as written in the built-in table and in
/// operator rule files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDef {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    pub pattern: String,
    pub targets: Vec<Target>,
}

impl RuleDef {
    pub fn new(
        id: &str,
        name: &str,
        severity: Severity,
        pattern: &str,
        targets: &[Target],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            severity,
            pattern: pattern.to_string(),
            targets: targets.to_vec(),
        }
    }
}

/// A rule with its pattern compiled. Immutable once built.
#[derive(Debug, Clone)]
pub struct Rule {
    def: RuleDef,
    regex: Regex,
}

impl Rule {
    /// Compile a definition. Patterns are always case-insensitive.
    pub fn compile(def: RuleDef) -> WafResult<Self> {
        if def.targets.is_empty() {
            return Err(WafError::NoTargets(def.id));
        }

        let regex = RegexBuilder::new(&def.pattern)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .dfa_size_limit(REGEX_DFA_SIZE_LIMIT)
            .build()
            .map_err(|source| WafError::InvalidPattern {
                id: def.id.clone(),
                source,
            })?;

        Ok(Self { def, regex })
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn severity(&self) -> Severity {
        self.def.severity
    }

    pub fn targets(&self) -> &[Target] {
        &self.def.targets
    }

    pub fn def(&self) -> &RuleDef {
        &self.def
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// On-disk layout of a rules file: a list of `[[rule]]` tables.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rule: Vec<RuleDef>,
}

pub fn load_rule_file(path: &Path) -> WafResult<Vec<RuleDef>> {
    let content = fs::read_to_string(path).map_err(|source| WafError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file: RuleFile = toml::from_str(&content).map_err(|source| WafError::RulesParse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(file.rule)
}
