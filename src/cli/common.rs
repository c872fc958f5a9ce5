//! Common helper functions shared across CLI commands
//!
//! This module provides shared functionality for loading configuration,
//! building the provider registry and choosing output settings.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::config::{CONFIG_FILE_NAME, ColorOption, Config, OutputFormat as ConfigFormat};
use crate::error::{ComposeError, ConfigError, RulestackError};
use crate::rules::ProviderRegistry;
use std::io::IsTerminal;
use std::path::Path;
use tracing::info;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_PARSE_ERROR: i32 = 3;

/// A loaded configuration with its provider registry
pub(crate) struct Workspace {
    pub config: Config,
    pub registry: ProviderRegistry,
}

/// Load rulestack.toml and every provider directory it names
///
/// Provider directories are resolved relative to the config file's directory.
///
/// # Errors
///
/// Returns `ConfigError::Io` if the config file does not exist or cannot be read,
/// other `ConfigError`s if it is invalid, and `ComposeError` if a provider
/// cannot be loaded or registered.
pub(crate) fn load_workspace(config_path: Option<&Path>) -> Result<Workspace, RulestackError> {
    let path = config_path.unwrap_or(Path::new(CONFIG_FILE_NAME));
    if !path.exists() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "{} not found. Run 'rulestack init' to create it.",
                path.display()
            ),
        ))
        .into());
    }

    let config = Config::load(path)?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let registry = build_registry(&config, base_dir)?;

    Ok(Workspace { config, registry })
}

/// Build the provider registry from the config's provider directories
///
/// # Errors
///
/// Returns `ComposeError` if a provider file is invalid or an identifier is
/// registered twice, including across directories.
pub(crate) fn build_registry(
    config: &Config,
    base_dir: &Path,
) -> Result<ProviderRegistry, ComposeError> {
    let mut registry = ProviderRegistry::new();
    for dir in config.provider_dirs(base_dir) {
        registry.load_dir(&dir)?;
    }
    info!("Registered {} provider(s)", registry.len());
    Ok(registry)
}

/// Pick the output format: the command-line flag wins over the config
pub(crate) fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.unwrap_or(match config.output.format {
        ConfigFormat::Human => OutputFormat::Human,
        ConfigFormat::Jsonl => OutputFormat::Jsonl,
    })
}

/// Pick the terminal color mode: the command-line flag wins over the config
pub(crate) fn resolve_color(flag: Option<ColorChoice>, config: &Config) -> termcolor::ColorChoice {
    let choice = flag.unwrap_or(match config.output.color {
        ColorOption::Auto => ColorChoice::Auto,
        ColorOption::Always => ColorChoice::Always,
        ColorOption::Never => ColorChoice::Never,
    });

    match choice {
        ColorChoice::Always => termcolor::ColorChoice::Always,
        ColorChoice::Never => termcolor::ColorChoice::Never,
        ColorChoice::Auto if std::io::stdout().is_terminal() => termcolor::ColorChoice::Auto,
        ColorChoice::Auto => termcolor::ColorChoice::Never,
    }
}

/// Print an error to stderr and return the matching exit code
///
/// Invalid TOML in rulestack.toml exits with `EXIT_PARSE_ERROR`; everything
/// else exits with `EXIT_ERROR`.
pub(crate) fn report_error(error: &RulestackError) -> i32 {
    eprintln!("Error: {}", error);
    match error {
        RulestackError::Config(ConfigError::Parse(_)) => EXIT_PARSE_ERROR,
        _ => EXIT_ERROR,
    }
}
