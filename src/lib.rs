pub mod config;
pub mod waf;
pub mod metrics;
pub mod logging;
pub mod cli;
pub mod utils;

pub use config::Config;
pub use waf::{waf_check, GatewayRequest, WafEngine, WafResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
