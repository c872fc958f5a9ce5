#![forbid(unsafe_code)]

//! Rule-set composition
//!
//! Providers are folded in order with last-writer-wins semantics, then the
//! overrides are folded on top, so precedence is always:
//!
//! overrides > later providers > earlier providers
//!
//! Settings are replaced whole. A severity-only override discards any options
//! an earlier provider attached to the same rule.

use crate::error::ComposeError;
use crate::rules::{
    ProviderRegistry, RawRuleMap, RuleMap, RuleProvider, RuleSetting, parse_rule_map,
};
use crate::types::{ProviderId, RuleName};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Origin label used when reporting invalid override settings
const OVERRIDES_ORIGIN: &str = "overrides";

/// Where an effective setting came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingSource {
    Provider(ProviderId),
    Override,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingSource::Provider(id) => write!(f, "{}", id),
            SettingSource::Override => f.write_str(OVERRIDES_ORIGIN),
        }
    }
}

impl Serialize for SettingSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The fully merged rule configuration handed to the execution engine
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EffectiveRuleMap {
    rules: RuleMap,
}

impl EffectiveRuleMap {
    /// Returns the setting for a rule, if any source defined it
    pub fn get(&self, rule: &RuleName) -> Option<&RuleSetting> {
        self.rules.get(rule)
    }

    /// Iterate over rules in name order
    pub fn iter(&self) -> impl Iterator<Item = (&RuleName, &RuleSetting)> {
        self.rules.iter()
    }

    /// Rules whose severity is not `off`
    pub fn enabled(&self) -> impl Iterator<Item = (&RuleName, &RuleSetting)> {
        self.rules.iter().filter(|(_, s)| s.severity().is_enabled())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn as_map(&self) -> &RuleMap {
        &self.rules
    }

    pub fn into_map(self) -> RuleMap {
        self.rules
    }
}

/// An effective setting together with the source that won
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRule {
    pub setting: RuleSetting,
    pub source: SettingSource,
}

/// Composition result that keeps provenance for every rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    entries: BTreeMap<RuleName, ResolvedRule>,
}

impl Composition {
    pub fn get(&self, rule: &RuleName) -> Option<&ResolvedRule> {
        self.entries.get(rule)
    }

    /// Iterate over resolved rules in name order
    pub fn iter(&self) -> impl Iterator<Item = (&RuleName, &ResolvedRule)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops provenance, keeping only the effective settings
    pub fn into_rule_map(self) -> EffectiveRuleMap {
        EffectiveRuleMap {
            rules: self
                .entries
                .into_iter()
                .map(|(rule, resolved)| (rule, resolved.setting))
                .collect(),
        }
    }
}

/// One source's contribution to a rule, in precedence order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub source: SettingSource,
    pub setting: RuleSetting,
}

/// Every contribution to a single rule, lowest precedence first
///
/// The last contribution is the effective one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTrace {
    pub rule: RuleName,
    pub contributions: Vec<Contribution>,
}

impl RuleTrace {
    /// The winning contribution, or None when no source defines the rule
    pub fn effective(&self) -> Option<&Contribution> {
        self.contributions.last()
    }

    /// Contributions that were replaced by a later source
    pub fn shadowed(&self) -> &[Contribution] {
        match self.contributions.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}

/// Compose providers and overrides into an effective rule map
///
/// Later providers replace earlier ones on rule-name collision and overrides
/// replace everything. Inputs are only borrowed.
pub fn compose<'a, I>(providers: I, overrides: &RuleMap) -> EffectiveRuleMap
where
    I: IntoIterator<Item = &'a RuleProvider>,
{
    compose_traced(providers, overrides).into_rule_map()
}

/// Like [`compose`], but records which source each effective setting came from
pub fn compose_traced<'a, I>(providers: I, overrides: &RuleMap) -> Composition
where
    I: IntoIterator<Item = &'a RuleProvider>,
{
    let mut entries: BTreeMap<RuleName, ResolvedRule> = BTreeMap::new();

    for provider in providers {
        fold_into(
            &mut entries,
            provider.rules(),
            SettingSource::Provider(provider.id().clone()),
        );
    }
    fold_into(&mut entries, overrides, SettingSource::Override);

    Composition { entries }
}

/// Last-writer-wins insertion of every rule in `rules`
fn fold_into(
    entries: &mut BTreeMap<RuleName, ResolvedRule>,
    rules: &RuleMap,
    source: SettingSource,
) {
    for (rule, setting) in rules {
        entries.insert(
            rule.clone(),
            ResolvedRule {
                setting: setting.clone(),
                source: source.clone(),
            },
        );
    }
}

/// Composes providers looked up by identifier from a registry
///
/// This is the entry point for configuration-driven composition: it resolves
/// identifiers and validates raw override values before folding, so failures
/// surface as `UnknownProvider` or `InvalidSetting` with no partial result.
pub struct RuleSetComposer<'r> {
    registry: &'r ProviderRegistry,
}

impl<'r> RuleSetComposer<'r> {
    pub fn new(registry: &'r ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Compose the named providers, in order, with raw overrides on top
    ///
    /// # Errors
    ///
    /// - `ComposeError::UnknownProvider` if an identifier is not registered
    /// - `ComposeError::InvalidSetting` if an override value is malformed
    pub fn compose(
        &self,
        extends: &[ProviderId],
        overrides: &RawRuleMap,
    ) -> Result<EffectiveRuleMap, ComposeError> {
        self.compose_traced(extends, overrides)
            .map(Composition::into_rule_map)
    }

    /// Like [`RuleSetComposer::compose`], keeping provenance
    pub fn compose_traced(
        &self,
        extends: &[ProviderId],
        overrides: &RawRuleMap,
    ) -> Result<Composition, ComposeError> {
        let providers = self.registry.resolve(extends)?;
        let overrides = parse_rule_map(overrides, OVERRIDES_ORIGIN)?;

        let composition = compose_traced(providers, &overrides);
        debug!(
            "Composed {} rule(s) from {} provider(s) and {} override(s)",
            composition.len(),
            extends.len(),
            overrides.len()
        );
        Ok(composition)
    }

    /// Trace every source that defines `rule`, in precedence order
    ///
    /// A rule defined nowhere yields an empty trace.
    ///
    /// # Errors
    ///
    /// Same as [`RuleSetComposer::compose`].
    pub fn explain(
        &self,
        extends: &[ProviderId],
        overrides: &RawRuleMap,
        rule: &RuleName,
    ) -> Result<RuleTrace, ComposeError> {
        let providers = self.registry.resolve(extends)?;
        let overrides = parse_rule_map(overrides, OVERRIDES_ORIGIN)?;

        let mut contributions: Vec<Contribution> = providers
            .iter()
            .filter_map(|provider| {
                provider.get(rule).map(|setting| Contribution {
                    source: SettingSource::Provider(provider.id().clone()),
                    setting: setting.clone(),
                })
            })
            .collect();

        if let Some(setting) = overrides.get(rule) {
            contributions.push(Contribution {
                source: SettingSource::Override,
                setting: setting.clone(),
            });
        }

        Ok(RuleTrace {
            rule: rule.clone(),
            contributions,
        })
    }
}
