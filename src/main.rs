use clap::{Parser, Subcommand};
use edge_waf::cli;
use anyhow::Result;

#[derive(Parser)]
#[command(name = "edge-waf")]
#[command(version = edge_waf::VERSION)]
#[command(about = "Request threat-classification engine for API gateways", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a gateway event read from a file or stdin
    Check(cli::check::CheckArgs),

    /// Inspect a request assembled from flags
    Test(cli::test::TestArgs),

    /// Rule catalog management
    Rules(cli::rules::RulesArgs),

    /// Configuration management
    Config(cli::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => cli::check::run(args),
        Commands::Test(args) => cli::test::run(args),
        Commands::Rules(args) => cli::rules::run(args),
        Commands::Config(args) => cli::config::run(args),
    }
}
