#![forbid(unsafe_code)]

//! Rule providers: named bundles of default rule settings
//!
//! A provider is immutable once built. Providers can be assembled in code or
//! loaded from a definition file:
//!
//! ```toml
//! [provider]
//! id = "react/recommended"
//! description = "Recommended rules for React components"
//!
//! [rules]
//! "react/jsx-key" = "error"
//! "react/prop-types" = ["error", { skipUndeclared = true }]
//! ```
//!
//! JSON files use the same two top-level keys.

use crate::error::ComposeError;
use crate::rules::setting::{RawRuleMap, RuleMap, RuleSetting, parse_rule_map};
use crate::types::{ProviderId, RuleName};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A named bundle of rule settings
#[derive(Debug, Clone, PartialEq)]
pub struct RuleProvider {
    id: ProviderId,
    description: Option<String>,
    rules: RuleMap,
    source_path: Option<PathBuf>,
}

/// On-disk provider definition
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProviderFile {
    provider: ProviderMeta,
    #[serde(default)]
    rules: RawRuleMap,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProviderMeta {
    id: String,
    #[serde(default)]
    description: Option<String>,
}

impl RuleProvider {
    /// Creates a provider from already-validated settings
    pub fn new(id: ProviderId, rules: RuleMap) -> Self {
        Self {
            id,
            description: None,
            rules,
            source_path: None,
        }
    }

    /// Creates a provider from raw values, validating every setting
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidSetting` naming the first bad rule.
    pub fn from_raw(id: ProviderId, raw: &RawRuleMap) -> Result<Self, ComposeError> {
        let origin = format!("provider '{}'", id);
        let rules = parse_rule_map(raw, &origin)?;
        Ok(Self::new(id, rules))
    }

    /// Attaches a human-readable description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Loads a provider from a `.toml` or `.json` definition file
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidProvider` if the file cannot be read, has
    /// an unsupported extension, or does not match the definition format, and
    /// `ComposeError::InvalidSetting` if a rule setting is malformed.
    pub fn from_path(path: &Path) -> Result<Self, ComposeError> {
        let invalid = |message: String| ComposeError::InvalidProvider {
            path: path.to_path_buf(),
            message,
        };

        let content =
            fs::read_to_string(path).map_err(|e| invalid(format!("failed to read file: {}", e)))?;

        let file: ProviderFile = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| invalid(e.to_string()))?,
            Some("json") => serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?,
            _ => return Err(invalid("expected a .toml or .json file".to_string())),
        };

        let id = ProviderId::new(file.provider.id.as_str()).ok_or_else(|| {
            invalid(format!(
                "invalid provider identifier '{}'",
                file.provider.id
            ))
        })?;

        let mut provider = Self::from_raw(id, &file.rules)?;
        provider.description = file.provider.description;
        provider.source_path = Some(path.to_path_buf());
        Ok(provider)
    }

    /// Returns the provider identifier
    pub fn id(&self) -> &ProviderId {
        &self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the rule settings defined by this provider
    pub fn rules(&self) -> &RuleMap {
        &self.rules
    }

    /// Returns the setting for a single rule, if defined
    pub fn get(&self, rule: &RuleName) -> Option<&RuleSetting> {
        self.rules.get(rule)
    }

    /// Returns the file this provider was loaded from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
