mod defaults;
pub mod logging;
pub mod parser;
pub mod security;
pub mod types;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::Result;

pub use logging::LoggingConfig;
pub use security::WafConfig;
pub use types::HeaderScope;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub waf: WafConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        parser::parse_config(path)
    }

    pub fn validate(&self) -> Result<Vec<String>> {
        validator::validate_config(self)
    }
}
