//! Explain command implementation
//!
//! `rulestack explain <rule>` lists every provider and override that sets the
//! rule, lowest precedence first, and marks the one that wins.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{
    EXIT_SUCCESS, Workspace, load_workspace, report_error, resolve_color, resolve_format,
};
use crate::engine::RuleSetComposer;
use crate::error::RulestackError;
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::types::RuleName;
use std::io::Write;
use std::path::Path;
use termcolor::{StandardStream, WriteColor};

/// Run the explain command
///
/// A rule that no source sets is reported, not treated as an error.
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error
/// - 3: Invalid TOML in rulestack.toml
pub fn run_explain(
    rule: &RuleName,
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
    match write_trace(&mut stdout, &workspace, rule, format) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// Load the workspace and write the trace for `rule` to `out`
pub fn explain_to(
    out: &mut dyn WriteColor,
    rule: &RuleName,
    config_path: Option<&Path>,
    format: Option<OutputFormat>,
) -> Result<(), RulestackError> {
    let workspace = load_workspace(config_path)?;
    let format = resolve_format(format, &workspace.config);
    write_trace(out, &workspace, rule, format)
}

fn write_trace(
    out: &mut dyn WriteColor,
    workspace: &Workspace,
    rule: &RuleName,
    format: OutputFormat,
) -> Result<(), RulestackError> {
    let config = &workspace.config;
    let composer = RuleSetComposer::new(&workspace.registry);
    let trace = composer.explain(&config.rulestack.extends, &config.rules, rule)?;

    match format {
        OutputFormat::Human => HumanFormatter::new().write_trace(out, &trace)?,
        OutputFormat::Jsonl => {
            out.write_all(JsonlFormatter::new().format_trace(&trace).as_bytes())?;
        }
    }

    out.flush()?;
    Ok(())
}
