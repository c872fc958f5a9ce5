//! Initialize a rulestack project
//!
//! Creates the configuration file and provider directory for a new project.

use std::fs;
use std::path::Path;

/// Default content for rulestack.toml
const DEFAULT_RULESTACK_TOML: &str = r#"[rulestack]
version = "1"

# Providers to compose, lowest precedence first
# extends = ["js/recommended", "react/recommended", "react-hooks/recommended"]

# Directories containing provider definition files (*.toml, *.json)
provider_dirs = ["rulesets"]

# Files the effective rules apply to
files = ["**/*.{js,jsx,ts,tsx}"]
ignores = ["dist/**"]

[globals]
# document = "readonly"
# window = "readonly"

[language]
# parser = "@typescript-eslint/parser"
ecma_version = "latest"
source_type = "module"

[settings]
# react = { version = "detect" }

[rules]
# Overrides win over every provider
# "react/react-in-jsx-scope" = "off"
# "no-unused-vars" = ["warn", { args = "none" }]

[output]
format = "human"
"#;

/// Directory scanned for provider definitions by default
const DEFAULT_PROVIDER_DIR: &str = "rulesets";

/// Error type for init command
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path error
    #[error("Path error: {0}")]
    Path(String),
}

/// Result of init command
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitResult {
    /// Files that were created
    pub created: Vec<String>,
    /// Files that were skipped (already existed)
    pub skipped: Vec<String>,
    /// Files that were overwritten
    pub overwritten: Vec<String>,
}

/// Run the init command
///
/// Creates the following in the current directory:
/// - rulestack.toml (main configuration)
/// - rulesets/ (directory for provider definitions)
///
/// # Arguments
/// * `force` - If true, overwrite existing files. If false, skip existing files.
pub fn run_init(force: bool) -> Result<InitResult, InitError> {
    let mut result = InitResult::default();

    handle_file(
        Path::new("rulestack.toml"),
        DEFAULT_RULESTACK_TOML,
        force,
        &mut result,
    )?;

    create_directory(DEFAULT_PROVIDER_DIR, &mut result)?;

    Ok(result)
}

/// Handle creation of a single file
fn handle_file(
    path: &Path,
    content: &str,
    force: bool,
    result: &mut InitResult,
) -> Result<(), InitError> {
    let path_str = path_to_string(path)?;

    if path.exists() {
        if force {
            fs::write(path, content)?;
            result.overwritten.push(path_str);
        } else {
            result.skipped.push(path_str);
        }
    } else {
        fs::write(path, content)?;
        result.created.push(path_str);
    }

    Ok(())
}

/// Create a directory if it doesn't exist
fn create_directory(path: &str, result: &mut InitResult) -> Result<(), InitError> {
    let dir_path = Path::new(path);

    if dir_path.exists() {
        if dir_path.is_dir() {
            Ok(())
        } else {
            Err(InitError::Path(format!(
                "Path '{}' exists but is not a directory",
                path
            )))
        }
    } else {
        fs::create_dir_all(dir_path)?;
        result.created.push(format!("{}/", path));
        Ok(())
    }
}

fn path_to_string(path: &Path) -> Result<String, InitError> {
    path.to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| InitError::Path(format!("Invalid UTF-8 in path: {:?}", path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Run `f` with the current directory set to a fresh temporary directory
    fn with_temp_dir<F, R>(f: F) -> R
    where
        F: FnOnce(&TempDir) -> R,
    {
        let temp_dir = TempDir::new().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        std::env::set_current_dir(temp_dir.path()).unwrap();
        let result = f(&temp_dir);
        std::env::set_current_dir(&original_dir).unwrap();

        result
    }

    #[test]
    #[serial]
    fn test_init_creates_all_files() {
        with_temp_dir(|temp_dir| {
            let result = run_init(false).expect("init should succeed");

            assert_eq!(
                result.created,
                vec!["rulestack.toml".to_string(), "rulesets/".to_string()]
            );
            assert!(result.skipped.is_empty());
            assert!(result.overwritten.is_empty());

            let content = fs::read_to_string(temp_dir.path().join("rulestack.toml")).unwrap();
            assert!(content.contains("[rulestack]"));
            assert!(temp_dir.path().join("rulesets").is_dir());
        });
    }

    #[test]
    #[serial]
    fn test_init_skips_existing_files_without_force() {
        with_temp_dir(|temp_dir| {
            fs::write("rulestack.toml", "existing content").unwrap();

            let result = run_init(false).expect("init should succeed");

            assert_eq!(result.skipped, vec!["rulestack.toml".to_string()]);
            let content = fs::read_to_string(temp_dir.path().join("rulestack.toml")).unwrap();
            assert_eq!(content, "existing content");
            assert!(result.created.contains(&"rulesets/".to_string()));
        });
    }

    #[test]
    #[serial]
    fn test_init_overwrites_existing_files_with_force() {
        with_temp_dir(|temp_dir| {
            fs::write("rulestack.toml", "old content").unwrap();

            let result = run_init(true).expect("init should succeed");

            assert_eq!(result.overwritten, vec!["rulestack.toml".to_string()]);
            let content = fs::read_to_string(temp_dir.path().join("rulestack.toml")).unwrap();
            assert_ne!(content, "old content");
        });
    }

    #[test]
    #[serial]
    fn test_init_is_idempotent() {
        with_temp_dir(|_temp_dir| {
            let first = run_init(false).expect("first init should succeed");
            assert_eq!(first.created.len(), 2);

            let second = run_init(false).expect("second init should succeed");
            assert_eq!(second.skipped, vec!["rulestack.toml".to_string()]);
            assert!(second.created.is_empty());
            assert!(second.overwritten.is_empty());
        });
    }

    #[test]
    #[serial]
    fn test_init_error_when_provider_dir_is_file() {
        with_temp_dir(|_temp_dir| {
            fs::write("rulesets", "this is a file").unwrap();

            let err = run_init(false).unwrap_err();
            assert!(err.to_string().contains("not a directory"));
        });
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::parse(DEFAULT_RULESTACK_TOML).unwrap();
        assert!(config.rulestack.extends.is_empty());
        assert!(config.rules.is_empty());
        assert_eq!(config.rulestack.ignores.len(), 1);
        assert!(!config.language.is_empty());
        assert!(config.settings.is_empty());
    }
}
