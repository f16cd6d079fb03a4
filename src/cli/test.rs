use clap::Args;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crate::waf::request::{Identity, RequestContext};
use crate::waf::GatewayRequest;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

#[derive(Args)]
pub struct TestArgs {
    #[arg(short, long, default_value = "/")]
    pub path: String,

    #[arg(short, long, default_value = "GET")]
    pub method: String,

    /// Query parameter as key=value, repeatable
    #[arg(short, long)]
    pub query: Vec<String>,

    #[arg(short, long)]
    pub body: Option<String>,

    /// Send the body base64-encoded
    #[arg(long)]
    pub base64: bool,

    #[arg(short, long)]
    pub user_agent: Option<String>,

    #[arg(short, long)]
    pub referer: Option<String>,

    #[arg(long, default_value = "127.0.0.1")]
    pub ip: String,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: TestArgs) -> Result<()> {
    let (_, engine) = super::load_engine(args.config.as_deref())?;
    let request = build_request(&args)?;

    println!("=== Testing WAF Rules ===");
    println!("Method: {}", args.method);
    println!("Path: {}", args.path);
    for pair in &args.query {
        println!("Query: {}", pair);
    }
    println!();

    super::print_outcome(engine.check(&request).as_ref())
}

fn build_request(args: &TestArgs) -> Result<GatewayRequest> {
    let mut query = BTreeMap::new();
    for pair in &args.query {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Query parameter must be key=value: {}", pair))?;
        query.insert(key.to_string(), value.to_string());
    }

    let mut headers = HashMap::new();
    if let Some(ref ua) = args.user_agent {
        headers.insert("User-Agent".to_string(), ua.clone());
    }
    if let Some(ref referer) = args.referer {
        headers.insert("Referer".to_string(), referer.clone());
    }

    let body = args.body.as_ref().map(|body| {
        let body = if args.base64 { STANDARD.encode(body) } else { body.clone() };
        serde_json::Value::String(body)
    });

    Ok(GatewayRequest {
        http_method: Some(args.method.to_uppercase()),
        path: Some(args.path.clone()),
        raw_path: None,
        query_string_parameters: (!query.is_empty()).then_some(query),
        headers: Some(headers),
        body,
        is_base64_encoded: args.base64,
        request_context: Some(RequestContext {
            identity: Some(Identity {
                source_ip: Some(args.ip.clone()),
            }),
            http: None,
        }),
    })
}
