use clap::{Args, Subcommand};
use anyhow::Result;
use crate::Config;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Validate a configuration file
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print the default configuration
    Default,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Check { config } => {
            println!("Checking configuration: {}", config.display());

            let cfg = Config::from_file(&config)?;
            let warnings = cfg.validate()?;

            if warnings.is_empty() {
                println!(" Configuration is valid!");
            } else {
                println!("Configuration loaded with warnings:\n");
                for warning in warnings {
                    println!("{}", warning);
                }
            }

            Ok(())
        }

        ConfigCommand::Default => {
            print!("{}", toml::to_string_pretty(&Config::default())?);
            Ok(())
        }
    }
}
