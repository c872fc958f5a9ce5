//! Rulestack CLI entry point

use clap::Parser;
use rulestack::cli::{Cli, Command};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Command::Init { force } => match rulestack::cli::init::run_init(force) {
            Ok(result) => {
                for path in &result.created {
                    println!("Created {}", path);
                }
                for path in &result.overwritten {
                    println!("Overwrote {}", path);
                }
                for path in &result.skipped {
                    println!("Skipped {} (already exists, use --force to overwrite)", path);
                }
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                2
            }
        },
        Command::Compose { config, format } => {
            rulestack::cli::compose::run_compose(config.as_deref(), format, cli.color)
        }
        Command::Explain {
            rule,
            config,
            format,
        } => rulestack::cli::explain::run_explain(&rule, config.as_deref(), format, cli.color),
        Command::List { config, format } => {
            rulestack::cli::list::run_list(config.as_deref(), format, cli.color)
        }
    };

    process::exit(exit_code);
}
