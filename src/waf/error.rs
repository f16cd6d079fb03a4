use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a rule catalog.
///
/// None of these can occur while a request is being inspected: a catalog
/// either compiles completely or the engine is never constructed.
#[derive(Debug, Error)]
pub enum WafError {
    #[error("rule {id}: invalid pattern: {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(String),

    #[error("rule id {0} is reserved")]
    ReservedRuleId(String),

    #[error("rule {0} declares no targets")]
    NoTargets(String),

    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file {path}: {source}")]
    RulesParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type WafResult<T> = Result<T, WafError>;
