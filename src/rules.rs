#![forbid(unsafe_code)]

//! Rule settings, providers and the provider registry

pub mod provider;
pub mod registry;
pub mod setting;

pub use provider::RuleProvider;
pub use registry::ProviderRegistry;
pub use setting::{RawRuleMap, RuleMap, RuleSetting, parse_rule_map};
