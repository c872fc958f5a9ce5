#![forbid(unsafe_code)]

//! Rulestack: rule-set composition for lint toolchains
//!
//! Rulestack loads named rule providers, merges them in precedence order and
//! applies caller overrides, producing the effective rule configuration an
//! external lint engine runs with.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod rules;
pub mod types;

// Re-export error types for convenient access
pub use error::{ComposeError, ConfigError, RulestackError};

// Re-export core domain types for convenient access
pub use engine::{EffectiveRuleMap, RuleSetComposer, compose};
pub use rules::{ProviderRegistry, RuleProvider, RuleSetting};
pub use types::{GlobPattern, ProviderId, RuleName, Severity};
