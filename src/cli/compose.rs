//! Compose command implementation
//!
//! This module implements the `rulestack compose` command, which:
//! - Loads configuration from rulestack.toml
//! - Loads provider definitions from the configured directories
//! - Composes the extended providers with the config's rule overrides
//! - Prints the effective configuration (human or JSONL)

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{
    EXIT_SUCCESS, Workspace, load_workspace, report_error, resolve_color, resolve_format,
};
use crate::engine::RuleSetComposer;
use crate::error::RulestackError;
use crate::output::{HumanFormatter, JsonlFormatter};
use std::io::Write;
use std::path::Path;
use termcolor::{StandardStream, WriteColor};

/// Run the compose command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error (unknown provider, invalid setting, I/O)
/// - 3: Invalid TOML in rulestack.toml
pub fn run_compose(
    config_path: Option<&Path>,
    format: Option<OutputFormat>,
    color: Option<ColorChoice>,
) -> i32 {
    let workspace = match load_workspace(config_path) {
        Ok(workspace) => workspace,
        Err(e) => return report_error(&e),
    };

    let mut stdout = StandardStream::stdout(resolve_color(color, &workspace.config));
    let format = resolve_format(format, &workspace.config);
    match write_composition(&mut stdout, &workspace, format) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// Load the workspace and write the effective configuration to `out`
///
/// # Errors
///
/// Returns `RulestackError` if loading or composition fails. Nothing is
/// written on failure.
pub fn compose_to(
    out: &mut dyn WriteColor,
    config_path: Option<&Path>,
    format: Option<OutputFormat>,
) -> Result<(), RulestackError> {
    let workspace = load_workspace(config_path)?;
    let format = resolve_format(format, &workspace.config);
    write_composition(out, &workspace, format)
}

fn write_composition(
    out: &mut dyn WriteColor,
    workspace: &Workspace,
    format: OutputFormat,
) -> Result<(), RulestackError> {
    let config = &workspace.config;
    let composer = RuleSetComposer::new(&workspace.registry);
    let composition = composer.compose_traced(&config.rulestack.extends, &config.rules)?;
    let resolved = config.resolve(composition.clone().into_rule_map());

    match format {
        OutputFormat::Human => {
            HumanFormatter::new().write_composition(out, &resolved, &composition)?;
        }
        OutputFormat::Jsonl => {
            let output = JsonlFormatter::new().format_composition(&resolved, &composition);
            out.write_all(output.as_bytes())?;
        }
    }

    out.flush()?;
    Ok(())
}
