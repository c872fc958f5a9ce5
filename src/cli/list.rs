//! List command implementation
//!
//! This module implements the `rulestack list` command, which:
//! - Lists every registered provider with its rule count
//! - Marks the providers the config extends, with their position
//! - Supports both human-readable and JSONL output formats

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{
    EXIT_SUCCESS, Workspace, load_workspace, report_error, resolve_color, resolve_format,
};
use crate::error::RulestackError;
use crate::output::{HumanFormatter, JsonlFormatter};
use std::io::Write;
use std::path::Path;
use termcolor::{StandardStream, WriteColor};

/// Run the list command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error
/// - 3: Invalid TOML in rulestack.toml
pub fn run_list(
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
    match write_providers(&mut stdout, &workspace, format) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// Load the workspace and write the provider listing to `out`
pub fn list_to(
    out: &mut dyn WriteColor,
    config_path: Option<&Path>,
    format: Option<OutputFormat>,
) -> Result<(), RulestackError> {
    let workspace = load_workspace(config_path)?;
    let format = resolve_format(format, &workspace.config);
    write_providers(out, &workspace, format)
}

fn write_providers(
    out: &mut dyn WriteColor,
    workspace: &Workspace,
    format: OutputFormat,
) -> Result<(), RulestackError> {
    let extends = &workspace.config.rulestack.extends;

    match format {
        OutputFormat::Human => {
            HumanFormatter::new().write_providers(out, &workspace.registry, extends)?
        }
        OutputFormat::Jsonl => {
            let output = JsonlFormatter::new().format_providers(&workspace.registry, extends);
            out.write_all(output.as_bytes())?;
        }
    }

    out.flush()?;
    Ok(())
}
