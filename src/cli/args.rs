//! CLI argument parsing using clap

use crate::types::RuleName;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for rulestack commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

/// Rulestack CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "rulestack")]
#[command(about = "Compose lint rule sets from named providers and overrides")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring (defaults to the config's [output] color)
    #[arg(long, global = true)]
    pub color: Option<ColorChoice>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available rulestack subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize rulestack in this directory
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Print the effective rule configuration
    Compose {
        /// Path to rulestack.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (defaults to the config's [output] format)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Show every source that sets a rule and which one wins
    Explain {
        /// Rule name to trace
        #[arg(value_parser = parse_rule_name)]
        rule: RuleName,

        /// Path to rulestack.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (defaults to the config's [output] format)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// List registered providers
    List {
        /// Path to rulestack.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (defaults to the config's [output] format)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
}

fn parse_rule_name(s: &str) -> Result<RuleName, String> {
    RuleName::try_from(s.to_string())
}
