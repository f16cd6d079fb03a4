use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use super::defaults::*;
use super::types::HeaderScope;
use crate::waf::target::ExtractOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WafConfig {
    #[serde(default = "default_true")]
    pub enable: bool,
    /// Bodies longer than this are blocked before pattern matching.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Prefix of the body handed to pattern rules.
    #[serde(default = "default_inspect_body_bytes")]
    pub inspect_body_bytes: usize,
    #[serde(default)]
    pub header_scope: HeaderScope,
    /// Extra `[[rule]]` definitions evaluated after the built-in catalog.
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
}

impl WafConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            inspect_body_bytes: self.inspect_body_bytes,
            header_scope: self.header_scope,
        }
    }
}

impl Default for WafConfig {
    fn default() -> Self {
        Self {
            enable: default_true(),
            max_body_bytes: default_max_body_bytes(),
            inspect_body_bytes: default_inspect_body_bytes(),
            header_scope: HeaderScope::default(),
            rules_path: None,
        }
    }
}
