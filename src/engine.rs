//! Rule-set composition engine

pub mod composer;

pub use composer::{
    Composition, Contribution, EffectiveRuleMap, ResolvedRule, RuleSetComposer, RuleTrace,
    SettingSource, compose, compose_traced,
};
