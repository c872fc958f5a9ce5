#![forbid(unsafe_code)]

//! Rule settings and their parsing from raw config values
//!
//! Raw values come from TOML or JSON documents and are accepted in the usual
//! lint-config shapes:
//! - `"error"` (severity string, case-insensitive)
//! - `2` (numeric severity: 0 = off, 1 = warn, 2 = error)
//! - `["error", { ... }]` (severity followed by an options payload)

use crate::error::ComposeError;
use crate::types::{RuleName, Severity};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// The setting for a single rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSetting {
    /// A plain severity level
    Level(Severity),
    /// A severity plus an options payload, opaque to the composer
    Configured {
        severity: Severity,
        options: Vec<Value>,
    },
}

/// Rule-name to setting mapping, ordered by rule name
pub type RuleMap = BTreeMap<RuleName, RuleSetting>;

/// Unvalidated rule-name to value mapping, as read from a config document
pub type RawRuleMap = BTreeMap<String, Value>;

impl RuleSetting {
    /// Returns the severity regardless of form
    pub fn severity(&self) -> Severity {
        match self {
            RuleSetting::Level(severity) => *severity,
            RuleSetting::Configured { severity, .. } => *severity,
        }
    }

    /// Returns the options payload (empty for a plain level)
    pub fn options(&self) -> &[Value] {
        match self {
            RuleSetting::Level(_) => &[],
            RuleSetting::Configured { options, .. } => options,
        }
    }

    /// Parses a raw config value into a setting
    ///
    /// The error string describes why the value was rejected; callers attach
    /// the rule name and origin.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Array(items) => {
                let (first, rest) = items
                    .split_first()
                    .ok_or_else(|| "empty setting array".to_string())?;
                let severity = parse_severity(first)?;
                if rest.is_empty() {
                    Ok(RuleSetting::Level(severity))
                } else {
                    Ok(RuleSetting::Configured {
                        severity,
                        options: rest.to_vec(),
                    })
                }
            }
            other => parse_severity(other).map(RuleSetting::Level),
        }
    }

    /// Converts the setting back to its canonical raw form
    pub fn to_value(&self) -> Value {
        match self {
            RuleSetting::Level(severity) => Value::String(severity.as_str().to_string()),
            RuleSetting::Configured { severity, options } => {
                let mut items = Vec::with_capacity(options.len() + 1);
                items.push(Value::String(severity.as_str().to_string()));
                items.extend(options.iter().cloned());
                Value::Array(items)
            }
        }
    }
}

impl Serialize for RuleSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RuleSetting::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn parse_severity(value: &Value) -> Result<Severity, String> {
    match value {
        Value::String(tag) => tag.parse(),
        Value::Number(n) => n
            .as_i64()
            .and_then(Severity::from_level)
            .ok_or_else(|| format!("unknown severity level {} (expected 0, 1 or 2)", n)),
        other => Err(format!(
            "expected a severity string, number or array, found {}",
            value_kind(other)
        )),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

/// Validates a raw rule map, attributing failures to `origin`
///
/// Fails on the first invalid rule name or setting; no partial map is returned.
pub fn parse_rule_map(raw: &RawRuleMap, origin: &str) -> Result<RuleMap, ComposeError> {
    let mut rules = RuleMap::new();
    for (name, value) in raw {
        let rule = RuleName::new(name.as_str()).ok_or_else(|| ComposeError::InvalidSetting {
            rule: name.clone(),
            origin: origin.to_string(),
            reason: "invalid rule name".to_string(),
        })?;
        let setting =
            RuleSetting::from_value(value).map_err(|reason| ComposeError::InvalidSetting {
                rule: name.clone(),
                origin: origin.to_string(),
                reason,
            })?;
        rules.insert(rule, setting);
    }
    Ok(rules)
}
