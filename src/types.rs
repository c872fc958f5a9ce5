#![forbid(unsafe_code)]

//! Core domain types for rulestack
//!
//! This module defines the validated identifiers and severity levels shared by
//! providers, overrides and the composer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rule severity levels understood by the lint-execution engine
///
/// Ordered from least to most severe, so `Severity::Off < Severity::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl Severity {
    /// Returns the canonical string form ("off", "warn", "error")
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    /// Maps the numeric form used by lint configs (0, 1, 2)
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(Severity::Off),
            1 => Some(Severity::Warn),
            2 => Some(Severity::Error),
            _ => None,
        }
    }

    /// Returns true unless the severity is `Off`
    pub fn is_enabled(&self) -> bool {
        *self != Severity::Off
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    /// Parses a severity tag, ignoring ASCII case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Severity::Off),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            _ => Err(format!(
                "unknown severity '{}' (expected off, warn or error)",
                s
            )),
        }
    }
}

/// A validated rule name
///
/// Rule names must be non-empty and free of whitespace and control characters.
/// Scoped names such as `@typescript-eslint/no-unused-vars` are valid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleName(String);

impl RuleName {
    /// Creates a new RuleName, validating the input
    ///
    /// Returns None if the input is empty or contains whitespace/control characters
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            return None;
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return None;
        }
        Some(RuleName(name))
    }

    /// Returns the rule name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleName::new(value.clone()).ok_or_else(|| format!("Invalid rule name '{}'", value))
    }
}

impl From<RuleName> for String {
    fn from(name: RuleName) -> Self {
        name.0
    }
}

/// A validated provider identifier, e.g. `react/recommended`
///
/// Identifiers must be non-empty and contain only alphanumeric characters and
/// `-`, `_`, `/`, `@`, `.`, `:`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    /// Creates a new ProviderId, validating the input
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            return None;
        }
        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '/' | '@' | '.' | ':'))
        {
            return None;
        }
        Some(ProviderId(id))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ProviderId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProviderId::new(value.clone())
            .ok_or_else(|| format!("Invalid provider identifier '{}'", value))
    }
}

impl From<ProviderId> for String {
    fn from(id: ProviderId) -> Self {
        id.0
    }
}

/// A glob pattern for file matching
///
/// Patterns are validated with `globset` when the config is loaded; matching
/// itself belongs to the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobPattern(String);

impl GlobPattern {
    /// Creates a new GlobPattern
    pub fn new(pattern: impl Into<String>) -> Self {
        GlobPattern(pattern.into())
    }

    /// Returns the pattern as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
