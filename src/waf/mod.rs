pub mod audit;
pub mod catalog;
pub mod decision;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod guard;
pub mod request;
pub mod response;
pub mod rules;
pub mod target;

pub use audit::{DecisionLogger, DecisionSink, MemorySink, StdoutSink};
pub use catalog::RuleCatalog;
pub use decision::{Block, Decision};
pub use engine::{waf_check, WafEngine};
pub use error::WafError;
pub use request::GatewayRequest;
pub use response::{forbidden, WafResponse};
pub use rules::{Rule, RuleDef, Severity, Target};
pub use target::{ExtractOptions, TargetSet};
