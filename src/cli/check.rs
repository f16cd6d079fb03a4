use clap::Args;
use anyhow::{Context, Result};
use crate::waf::GatewayRequest;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Gateway event JSON file, or '-' for stdin
    #[arg(short, long, default_value = "-")]
    pub event: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print WAF counters after the decision
    #[arg(long)]
    pub metrics: bool,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let (_, engine) = super::load_engine(args.config.as_deref())?;

    let content = if args.event.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read event from stdin")?;
        buffer
    } else {
        fs::read_to_string(&args.event)
            .with_context(|| format!("Failed to read event file: {}", args.event.display()))?
    };

    let request: GatewayRequest =
        serde_json::from_str(&content).context("Failed to parse gateway event")?;

    let outcome = engine.check(&request);
    super::print_outcome(outcome.as_ref())?;

    if args.metrics {
        eprint!("{}", crate::metrics::export_metrics()?);
    }

    Ok(())
}
