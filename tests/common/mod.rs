//! Shared fixtures for rulestack integration tests

#![allow(dead_code)]

use rulestack::rules::{RawRuleMap, RuleProvider};
use rulestack::types::{ProviderId, RuleName};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn rule(name: &str) -> RuleName {
    RuleName::new(name).expect("valid rule name")
}

pub fn provider_id(id: &str) -> ProviderId {
    ProviderId::new(id).expect("valid provider id")
}

/// Build a provider from `(rule, raw value)` pairs
pub fn provider(id: &str, rules: &[(&str, Value)]) -> RuleProvider {
    let raw: RawRuleMap = rules
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    RuleProvider::from_raw(provider_id(id), &raw).expect("valid provider")
}

/// Write a TOML provider definition into `dir`
pub fn write_provider(dir: &Path, file_name: &str, id: &str, rules_toml: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("create provider dir");
    let path = dir.join(file_name);
    let content = format!("[provider]\nid = \"{}\"\n\n[rules]\n{}", id, rules_toml);
    fs::write(&path, content).expect("write provider file");
    path
}

/// Write the providers mirroring a typical React + TypeScript lint setup
pub fn write_react_providers(dir: &Path) {
    write_provider(
        dir,
        "js.toml",
        "js/recommended",
        r#"
"no-unused-vars" = "error"
"no-undef" = "error"
"eqeqeq" = "warn"
"#,
    );
    write_provider(
        dir,
        "react.toml",
        "react/recommended",
        r#"
"react/jsx-key" = "error"
"react/react-in-jsx-scope" = "error"
"react/prop-types" = ["error", { skipUndeclared = true }]
"#,
    );
    write_provider(
        dir,
        "react-hooks.toml",
        "react-hooks/recommended",
        r#"
"react-hooks/rules-of-hooks" = "error"
"react-hooks/exhaustive-deps" = "warn"
"#,
    );
}

/// Write rulestack.toml into `dir` and return its path
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("rulestack.toml");
    fs::write(&path, content).expect("write config");
    path
}
