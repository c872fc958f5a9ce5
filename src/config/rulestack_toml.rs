//! Parsing and validation for rulestack.toml configuration files

use crate::engine::EffectiveRuleMap;
use crate::error::ConfigError;
use crate::rules::RawRuleMap;
use crate::types::{GlobPattern, ProviderId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "rulestack.toml";

/// Main configuration struct for rulestack.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rulestack metadata
    pub rulestack: RulestackMeta,

    /// Identifiers of language globals, with their access mode
    #[serde(default)]
    pub globals: BTreeMap<String, GlobalAccess>,

    /// Parser and language options for the execution engine
    #[serde(default)]
    pub language: LanguageOptions,

    /// Shared settings read by plugin rules, e.g. `react = { version = "detect" }`
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,

    /// Rule overrides, applied after every provider
    #[serde(default)]
    pub rules: RawRuleMap,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Rule override values are not checked here; they are validated when the
    /// composer parses them so the error names the offending rule.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.rulestack.version != "1" {
            return Err(ConfigError::Validation(format!(
                "Unsupported configuration version '{}'. Expected '1'",
                self.rulestack.version
            )));
        }

        for pattern in &self.rulestack.files {
            globset::Glob::new(pattern.as_str()).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid files glob pattern '{}': {}",
                    pattern.as_str(),
                    e
                ))
            })?;
        }

        for pattern in &self.rulestack.ignores {
            globset::Glob::new(pattern.as_str()).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid ignores glob pattern '{}': {}",
                    pattern.as_str(),
                    e
                ))
            })?;
        }

        if self.language.parser.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "Language parser must not be empty".to_string(),
            ));
        }

        for name in self.globals.keys() {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "Invalid global identifier '{}'",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Provider directories resolved against `base_dir`
    pub fn provider_dirs(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.rulestack
            .provider_dirs
            .iter()
            .map(|dir| base_dir.join(dir))
            .collect()
    }

    /// Assemble the record handed to the execution engine
    pub fn resolve(&self, rules: EffectiveRuleMap) -> ResolvedConfig {
        ResolvedConfig {
            files: self.rulestack.files.clone(),
            ignores: self.rulestack.ignores.clone(),
            globals: self.globals.clone(),
            language: self.language.clone(),
            settings: self.settings.clone(),
            rules,
        }
    }
}

/// Rulestack metadata section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulestackMeta {
    /// Configuration version (must be "1")
    pub version: String,

    /// Providers to compose, lowest precedence first
    #[serde(default)]
    pub extends: Vec<ProviderId>,

    /// Directories scanned for provider definition files
    #[serde(default = "default_provider_dirs")]
    pub provider_dirs: Vec<PathBuf>,

    /// File patterns the effective rules apply to
    #[serde(default = "default_files")]
    pub files: Vec<GlobPattern>,

    /// File patterns excluded from linting
    #[serde(default)]
    pub ignores: Vec<GlobPattern>,
}

fn default_provider_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("rulesets")]
}

fn default_files() -> Vec<GlobPattern> {
    vec![GlobPattern::new("**/*")]
}

/// Access mode of a language global
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalAccess {
    /// May be read but not reassigned
    Readonly,
    /// May be read and reassigned
    Writable,
    /// Treated as undefined
    Off,
}

/// The `[language]` section: how the execution engine parses source files
///
/// Every field is optional and passed through untouched; the engine applies
/// its own defaults for anything left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageOptions {
    /// Parser module, e.g. `@typescript-eslint/parser`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecma_version: Option<EcmaVersion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
}

impl LanguageOptions {
    /// Returns true when no option is set
    pub fn is_empty(&self) -> bool {
        self.parser.is_none() && self.ecma_version.is_none() && self.source_type.is_none()
    }
}

/// ECMAScript version: an edition or year number, or `"latest"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcmaVersion {
    Latest,
    Version(u16),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEcmaVersion {
    Number(u16),
    Text(String),
}

impl<'de> Deserialize<'de> for EcmaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawEcmaVersion::deserialize(deserializer)? {
            RawEcmaVersion::Number(version) => Ok(EcmaVersion::Version(version)),
            RawEcmaVersion::Text(text) if text == "latest" => Ok(EcmaVersion::Latest),
            RawEcmaVersion::Text(text) => Err(serde::de::Error::custom(format!(
                "invalid ecma_version '{}' (expected a version number or \"latest\")",
                text
            ))),
        }
    }
}

impl Serialize for EcmaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EcmaVersion::Latest => serializer.serialize_str("latest"),
            EcmaVersion::Version(version) => serializer.serialize_u16(*version),
        }
    }
}

impl fmt::Display for EcmaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcmaVersion::Latest => f.write_str("latest"),
            EcmaVersion::Version(version) => write!(f, "{}", version),
        }
    }
}

/// How source files are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Module,
    Script,
    Commonjs,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceType::Module => "module",
            SourceType::Script => "script",
            SourceType::Commonjs => "commonjs",
        })
    }
}

/// Output configuration section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Color output setting
    #[serde(default)]
    pub color: ColorOption,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

/// The effective configuration consumed by the execution engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub files: Vec<GlobPattern>,
    pub ignores: Vec<GlobPattern>,
    pub globals: BTreeMap<String, GlobalAccess>,
    pub language: LanguageOptions,
    pub settings: BTreeMap<String, Value>,
    pub rules: EffectiveRuleMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID_CONFIG: &str = r#"
[rulestack]
version = "1"
extends = ["js/recommended", "react/recommended", "react-hooks/recommended"]
provider_dirs = ["rulesets", "vendor/rulesets"]
files = ["**/*.{js,jsx,ts,tsx}"]
ignores = ["dist/**"]

[globals]
document = "readonly"
window = "readonly"
console = "readonly"

[rules]
"react/react-in-jsx-scope" = "off"
"no-unused-vars" = ["warn", { args = "none" }]

[output]
format = "human"
color = "auto"
"#;

    #[test]
    fn test_valid_config_parsing() {
        let config = Config::parse(VALID_CONFIG).unwrap();

        assert_eq!(config.rulestack.version, "1");
        let extends: Vec<&str> = config.rulestack.extends.iter().map(|p| p.as_str()).collect();
        assert_eq!(
            extends,
            vec!["js/recommended", "react/recommended", "react-hooks/recommended"]
        );
        assert_eq!(config.rulestack.provider_dirs.len(), 2);
        assert_eq!(config.rulestack.files.len(), 1);
        assert_eq!(config.rulestack.ignores.len(), 1);

        assert_eq!(config.globals.len(), 3);
        assert_eq!(config.globals.get("document"), Some(&GlobalAccess::Readonly));

        assert_eq!(config.rules.get("react/react-in-jsx-scope"), Some(&json!("off")));
        assert_eq!(
            config.rules.get("no-unused-vars"),
            Some(&json!(["warn", { "args": "none" }]))
        );

        assert_eq!(config.output.format, OutputFormat::Human);
        assert_eq!(config.output.color, ColorOption::Auto);
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::parse("[rulestack]\nversion = \"1\"\n").unwrap();
        assert!(config.rulestack.extends.is_empty());
        assert_eq!(
            config.rulestack.provider_dirs,
            vec![PathBuf::from("rulesets")]
        );
        assert_eq!(config.rulestack.files, vec![GlobPattern::new("**/*")]);
        assert!(config.rulestack.ignores.is_empty());
        assert!(config.globals.is_empty());
        assert!(config.rules.is_empty());
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_invalid_version() {
        let result = Config::parse("[rulestack]\nversion = \"2\"\n");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unsupported configuration version")
        );
    }

    #[test]
    fn test_missing_version() {
        assert!(Config::parse("[rulestack]\nextends = []\n").is_err());
    }

    #[test]
    fn test_version_must_be_string() {
        assert!(Config::parse("[rulestack]\nversion = 1\n").is_err());
    }

    #[test]
    fn test_invalid_files_glob() {
        let invalid = r#"
[rulestack]
version = "1"
files = ["[invalid"]
"#;
        let err = Config::parse(invalid).unwrap_err();
        assert!(err.to_string().contains("Invalid files glob pattern"));
    }

    #[test]
    fn test_invalid_ignores_glob() {
        let invalid = r#"
[rulestack]
version = "1"
ignores = ["[invalid"]
"#;
        let err = Config::parse(invalid).unwrap_err();
        assert!(err.to_string().contains("Invalid ignores glob pattern"));
    }

    #[test]
    fn test_invalid_provider_identifier() {
        let invalid = r#"
[rulestack]
version = "1"
extends = ["not valid"]
"#;
        assert!(Config::parse(invalid).is_err());
    }

    #[test]
    fn test_language_and_settings_parsing() {
        let config = Config::parse(
            r#"
[rulestack]
version = "1"

[language]
parser = "@typescript-eslint/parser"
ecma_version = "latest"
source_type = "module"

[settings]
react = { version = "detect" }
"#,
        )
        .unwrap();

        assert_eq!(
            config.language.parser.as_deref(),
            Some("@typescript-eslint/parser")
        );
        assert_eq!(config.language.ecma_version, Some(EcmaVersion::Latest));
        assert_eq!(config.language.source_type, Some(SourceType::Module));
        assert_eq!(
            config.settings.get("react"),
            Some(&json!({ "version": "detect" }))
        );
    }

    #[test]
    fn test_language_defaults_to_empty() {
        let config = Config::parse("[rulestack]\nversion = \"1\"\n").unwrap();
        assert!(config.language.is_empty());
        assert!(config.settings.is_empty());
    }

    #[test]
    fn test_numeric_ecma_version() {
        let config =
            Config::parse("[rulestack]\nversion = \"1\"\n\n[language]\necma_version = 2022\n")
                .unwrap();
        assert_eq!(config.language.ecma_version, Some(EcmaVersion::Version(2022)));
        assert_eq!(
            serde_json::to_value(config.language).unwrap(),
            json!({ "ecma_version": 2022 })
        );
    }

    #[test]
    fn test_invalid_language_options() {
        let base = "[rulestack]\nversion = \"1\"\n\n[language]\n";
        assert!(Config::parse(&format!("{}ecma_version = \"next\"\n", base)).is_err());
        assert!(Config::parse(&format!("{}source_type = \"esm\"\n", base)).is_err());
        assert!(Config::parse(&format!("{}sourceType = \"module\"\n", base)).is_err());

        let err = Config::parse(&format!("{}parser = \"\"\n", base)).unwrap_err();
        assert!(err.to_string().contains("Language parser must not be empty"));
    }

    #[test]
    fn test_resolve_passes_language_and_settings_through() {
        let config = Config::parse(
            r#"
[rulestack]
version = "1"

[language]
parser = "@typescript-eslint/parser"
source_type = "module"

[settings]
react = { version = "detect" }
"#,
        )
        .unwrap();

        let resolved = config.resolve(EffectiveRuleMap::default());
        assert_eq!(resolved.language, config.language);
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({
                "files": ["**/*"],
                "ignores": [],
                "globals": {},
                "language": { "parser": "@typescript-eslint/parser", "source_type": "module" },
                "settings": { "react": { "version": "detect" } },
                "rules": {}
            })
        );
    }

    #[test]
    fn test_repeated_extends_entry_is_kept() {
        let config = Config::parse(
            r#"
[rulestack]
version = "1"
extends = ["a", "b", "a"]
"#,
        )
        .unwrap();
        let extends: Vec<&str> = config.rulestack.extends.iter().map(|p| p.as_str()).collect();
        assert_eq!(extends, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_invalid_global_access() {
        let invalid = r#"
[rulestack]
version = "1"

[globals]
window = "sometimes"
"#;
        assert!(Config::parse(invalid).is_err());
    }

    #[test]
    fn test_invalid_global_name() {
        let invalid = r#"
[rulestack]
version = "1"

[globals]
"my global" = "readonly"
"#;
        let err = Config::parse(invalid).unwrap_err();
        assert!(err.to_string().contains("Invalid global identifier"));
    }

    #[test]
    fn test_rule_values_are_not_validated_at_parse() {
        let config_str = r#"
[rulestack]
version = "1"

[rules]
eqeqeq = "maybe"
"#;
        let config = Config::parse(config_str).unwrap();
        assert_eq!(config.rules.get("eqeqeq"), Some(&json!("maybe")));
    }

    #[test]
    fn test_jsonl_output_format() {
        let config_str = r#"
[rulestack]
version = "1"

[output]
format = "jsonl"
color = "never"
"#;
        let config = Config::parse(config_str).unwrap();
        assert_eq!(config.output.format, OutputFormat::Jsonl);
        assert_eq!(config.output.color, ColorOption::Never);
    }

    #[test]
    fn test_invalid_output_format() {
        let invalid = r#"
[rulestack]
version = "1"

[output]
format = "xml"
"#;
        assert!(Config::parse(invalid).is_err());
    }

    #[test]
    fn test_provider_dirs_resolved_against_base() {
        let config = Config::parse(VALID_CONFIG).unwrap();
        let dirs = config.provider_dirs(Path::new("/project"));
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/project/rulesets"),
                PathBuf::from("/project/vendor/rulesets")
            ]
        );
    }

    #[test]
    fn test_resolve_carries_passthrough_fields() {
        let config = Config::parse(VALID_CONFIG).unwrap();
        let resolved = config.resolve(EffectiveRuleMap::default());
        assert_eq!(resolved.files, config.rulestack.files);
        assert_eq!(resolved.ignores, config.rulestack.ignores);
        assert_eq!(resolved.globals.len(), 3);
        assert!(resolved.rules.is_empty());
    }
}
