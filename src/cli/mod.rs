pub mod check;
pub mod config;
pub mod rules;
pub mod test;

pub use check::CheckArgs;
pub use config::ConfigArgs;
pub use rules::RulesArgs;
pub use test::TestArgs;

use crate::waf::WafEngine;
use crate::waf::WafResponse;
use crate::Config;
use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration (defaults when no file is given), start logging and
/// build the engine.
pub(crate) fn load_engine(config_path: Option<&Path>) -> Result<(Config, WafEngine)> {
    let config = match config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    crate::logging::init_logging(&config.logging.level, &config.logging.format)?;

    let engine = WafEngine::new(&config.waf).context("Failed to build WAF engine")?;
    Ok((config, engine))
}

pub(crate) fn print_outcome(outcome: Option<&WafResponse>) -> Result<()> {
    match outcome {
        None => println!("ALLOW"),
        Some(response) => {
            println!("BLOCK {}", response.message);
            println!("{}", serde_json::to_string_pretty(response)?);
        }
    }
    Ok(())
}
