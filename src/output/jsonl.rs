#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in a deterministic order. Every record
//! carries a `type` field so consumers can dispatch without lookahead.

use crate::config::{GlobalAccess, LanguageOptions, ResolvedConfig};
use crate::engine::{Composition, RuleTrace, SettingSource};
use crate::rules::{ProviderRegistry, RuleSetting};
use crate::types::{GlobPattern, ProviderId};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format the effective configuration as JSONL
    ///
    /// Returns:
    /// - One rule record per rule, in rule-name order
    /// - One config record with the passthrough fields
    /// - One summary record
    pub fn format_composition(&self, resolved: &ResolvedConfig, composition: &Composition) -> String {
        let mut output = String::new();

        for (rule, resolved_rule) in composition.iter() {
            push_record(
                &mut output,
                &RuleRecord {
                    record_type: "rule",
                    rule: rule.as_str(),
                    setting: &resolved_rule.setting,
                    source: &resolved_rule.source,
                },
            );
        }

        push_record(
            &mut output,
            &ConfigRecord {
                record_type: "config",
                files: &resolved.files,
                ignores: &resolved.ignores,
                globals: &resolved.globals,
                language: &resolved.language,
                settings: &resolved.settings,
            },
        );

        push_record(
            &mut output,
            &SummaryRecord {
                record_type: "summary",
                rules: resolved.rules.len() as u64,
                enabled: resolved.rules.enabled().count() as u64,
            },
        );

        output
    }

    /// Format a rule trace as JSONL: one contribution record per source, lowest
    /// precedence first, then one record naming the effective source
    pub fn format_trace(&self, trace: &RuleTrace) -> String {
        let mut output = String::new();
        let last = trace.contributions.len().checked_sub(1);

        for (index, contribution) in trace.contributions.iter().enumerate() {
            push_record(
                &mut output,
                &ContributionRecord {
                    record_type: "contribution",
                    rule: trace.rule.as_str(),
                    source: &contribution.source,
                    setting: &contribution.setting,
                    effective: Some(index) == last,
                },
            );
        }

        push_record(
            &mut output,
            &TraceRecord {
                record_type: "trace",
                rule: trace.rule.as_str(),
                defined: !trace.contributions.is_empty(),
                effective: trace.effective().map(|c| &c.setting),
                source: trace.effective().map(|c| &c.source),
            },
        );

        output
    }

    /// Format registered providers as JSONL, one record per provider
    pub fn format_providers(&self, registry: &ProviderRegistry, extends: &[ProviderId]) -> String {
        let mut output = String::new();

        for provider in registry.iter() {
            push_record(
                &mut output,
                &ProviderRecord {
                    record_type: "provider",
                    id: provider.id().as_str(),
                    description: provider.description(),
                    rules: provider.len() as u64,
                    extended: extends.contains(provider.id()),
                    path: provider.source_path(),
                },
            );
        }

        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_record<T: Serialize>(output: &mut String, record: &T) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

/// Rule record for JSONL output
#[derive(Debug, Serialize)]
struct RuleRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    rule: &'a str,
    setting: &'a RuleSetting,
    source: &'a SettingSource,
}

/// Passthrough config record for JSONL output
#[derive(Debug, Serialize)]
struct ConfigRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    files: &'a [GlobPattern],
    ignores: &'a [GlobPattern],
    globals: &'a BTreeMap<String, GlobalAccess>,
    language: &'a LanguageOptions,
    settings: &'a BTreeMap<String, Value>,
}

/// Summary record for JSONL output
#[derive(Debug, Serialize)]
struct SummaryRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    rules: u64,
    enabled: u64,
}

#[derive(Debug, Serialize)]
struct ContributionRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    rule: &'a str,
    source: &'a SettingSource,
    setting: &'a RuleSetting,
    effective: bool,
}

#[derive(Debug, Serialize)]
struct TraceRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    rule: &'a str,
    defined: bool,
    effective: Option<&'a RuleSetting>,
    source: Option<&'a SettingSource>,
}

#[derive(Debug, Serialize)]
struct ProviderRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    rules: u64,
    extended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a Path>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::{Contribution, compose_traced};
    use crate::rules::{RuleMap, RuleProvider};
    use crate::types::{RuleName, Severity};
    use serde_json::{Value, json};

    fn rule(s: &str) -> RuleName {
        RuleName::new(s).unwrap()
    }

    fn parse_lines(output: &str) -> Vec<Value> {
        output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_format_composition() {
        let mut rules = RuleMap::new();
        rules.insert(rule("no-unused-vars"), RuleSetting::Level(Severity::Warn));
        rules.insert(
            rule("eqeqeq"),
            RuleSetting::Configured {
                severity: Severity::Error,
                options: vec![json!("always")],
            },
        );
        let provider = RuleProvider::new(ProviderId::new("js/recommended").unwrap(), rules);
        let mut overrides = RuleMap::new();
        overrides.insert(rule("no-unused-vars"), RuleSetting::Level(Severity::Off));

        let composition = compose_traced([&provider], &overrides);
        let config = Config::parse("[rulestack]\nversion = \"1\"\n").unwrap();
        let resolved = config.resolve(composition.clone().into_rule_map());

        let records = parse_lines(&JsonlFormatter::new().format_composition(&resolved, &composition));
        assert_eq!(records.len(), 4);

        assert_eq!(
            records[0],
            json!({
                "type": "rule",
                "rule": "eqeqeq",
                "setting": ["error", "always"],
                "source": "js/recommended"
            })
        );
        assert_eq!(
            records[1],
            json!({
                "type": "rule",
                "rule": "no-unused-vars",
                "setting": "off",
                "source": "overrides"
            })
        );
        assert_eq!(records[2]["type"], "config");
        assert_eq!(records[2]["files"], json!(["**/*"]));
        assert_eq!(records[2]["language"], json!({}));
        assert_eq!(records[2]["settings"], json!({}));
        assert_eq!(
            records[3],
            json!({ "type": "summary", "rules": 2, "enabled": 1 })
        );
    }

    #[test]
    fn test_format_composition_config_record_carries_language() {
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
        let composition = Composition::default();
        let resolved = config.resolve(composition.clone().into_rule_map());

        let records = parse_lines(&JsonlFormatter::new().format_composition(&resolved, &composition));
        assert_eq!(
            records[0],
            json!({
                "type": "config",
                "files": ["**/*"],
                "ignores": [],
                "globals": {},
                "language": {
                    "parser": "@typescript-eslint/parser",
                    "ecma_version": "latest",
                    "source_type": "module"
                },
                "settings": { "react": { "version": "detect" } }
            })
        );
    }

    #[test]
    fn test_format_trace() {
        let trace = RuleTrace {
            rule: rule("eqeqeq"),
            contributions: vec![
                Contribution {
                    source: SettingSource::Provider(ProviderId::new("a").unwrap()),
                    setting: RuleSetting::Level(Severity::Warn),
                },
                Contribution {
                    source: SettingSource::Override,
                    setting: RuleSetting::Level(Severity::Off),
                },
            ],
        };

        let records = parse_lines(&JsonlFormatter::new().format_trace(&trace));
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["effective"], false);
        assert_eq!(records[1]["effective"], true);
        assert_eq!(
            records[2],
            json!({
                "type": "trace",
                "rule": "eqeqeq",
                "defined": true,
                "effective": "off",
                "source": "overrides"
            })
        );
    }

    #[test]
    fn test_format_trace_undefined_rule() {
        let trace = RuleTrace {
            rule: rule("eqeqeq"),
            contributions: Vec::new(),
        };

        let records = parse_lines(&JsonlFormatter::new().format_trace(&trace));
        assert_eq!(
            records,
            vec![json!({
                "type": "trace",
                "rule": "eqeqeq",
                "defined": false,
                "effective": null,
                "source": null
            })]
        );
    }

    #[test]
    fn test_format_providers() {
        let mut registry = ProviderRegistry::new();
        let mut rules = RuleMap::new();
        rules.insert(rule("eqeqeq"), RuleSetting::Level(Severity::Warn));
        registry
            .register(RuleProvider::new(ProviderId::new("core").unwrap(), rules))
            .unwrap();
        registry
            .register(
                RuleProvider::new(ProviderId::new("extra").unwrap(), RuleMap::new())
                    .with_description("Extra rules"),
            )
            .unwrap();

        let extends = vec![ProviderId::new("core").unwrap()];
        let records = parse_lines(&JsonlFormatter::new().format_providers(&registry, &extends));

        assert_eq!(
            records,
            vec![
                json!({ "type": "provider", "id": "core", "rules": 1, "extended": true }),
                json!({
                    "type": "provider",
                    "id": "extra",
                    "description": "Extra rules",
                    "rules": 0,
                    "extended": false
                }),
            ]
        );
    }
}
