use clap::{Args, Subcommand};
use anyhow::{Context, Result};
use crate::waf::catalog::default_rules;
use crate::waf::rules::RuleFile;
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Subcommand)]
pub enum RulesCommand {
    /// List the active catalog in evaluation order
    List {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write the built-in catalog as a rules file
    Generate {
        #[arg(short, long, default_value = "waf_rules.toml")]
        output: PathBuf,
    },
}

pub fn run(args: RulesArgs) -> Result<()> {
    match args.command {
        RulesCommand::List { config } => {
            let (_, engine) = super::load_engine(config.as_deref())?;

            println!("=== WAF Rules ({}) ===", engine.rules_count());
            for rule in engine.catalog() {
                let targets: Vec<String> = rule.targets().iter().map(|t| t.to_string()).collect();
                println!(
                    "{:<12} {:<9} [{}] {}",
                    rule.id(),
                    rule.severity().to_string(),
                    targets.join(","),
                    rule.name()
                );
            }

            Ok(())
        }

        RulesCommand::Generate { output } => {
            let file = RuleFile { rule: default_rules() };
            let content = toml::to_string_pretty(&file).context("Failed to serialize rules")?;

            fs::write(&output, content)
                .with_context(|| format!("Failed to write rules file: {}", output.display()))?;

            println!("[OK] Generated {} rules: {}", file.rule.len(), output.display());
            Ok(())
        }
    }
}
