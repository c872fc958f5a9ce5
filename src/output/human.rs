#![forbid(unsafe_code)]

//! Human-readable output formatter
//!
//! Writes to any `termcolor::WriteColor`, so the same code drives colored
//! terminal output and plain in-memory buffers in tests.

use crate::config::{GlobalAccess, LanguageOptions, ResolvedConfig};
use crate::engine::{Composition, RuleTrace};
use crate::rules::{ProviderRegistry, RuleSetting};
use crate::types::{ProviderId, Severity};
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Human-readable formatter for composition results
pub struct HumanFormatter;

impl HumanFormatter {
    /// Creates a new HumanFormatter
    pub fn new() -> Self {
        HumanFormatter
    }

    /// Write the effective configuration with the source of every rule
    pub fn write_composition(
        &self,
        out: &mut dyn WriteColor,
        resolved: &ResolvedConfig,
        composition: &Composition,
    ) -> io::Result<()> {
        let enabled = resolved.rules.enabled().count();
        writeln!(
            out,
            "Effective configuration ({} rules, {} enabled)",
            resolved.rules.len(),
            enabled
        )?;
        writeln!(out)?;

        let files: Vec<&str> = resolved.files.iter().map(|p| p.as_str()).collect();
        writeln!(out, "Files:   {}", files.join(", "))?;
        if !resolved.ignores.is_empty() {
            let ignores: Vec<&str> = resolved.ignores.iter().map(|p| p.as_str()).collect();
            writeln!(out, "Ignores: {}", ignores.join(", "))?;
        }
        if !resolved.globals.is_empty() {
            let globals: Vec<String> = resolved
                .globals
                .iter()
                .map(|(name, access)| format!("{} ({})", name, global_access_str(*access)))
                .collect();
            writeln!(out, "Globals: {}", globals.join(", "))?;
        }
        if !resolved.language.is_empty() {
            writeln!(out, "Language: {}", language_summary(&resolved.language))?;
        }
        if !resolved.settings.is_empty() {
            if let Ok(settings) = serde_json::to_string(&resolved.settings) {
                writeln!(out, "Settings: {}", settings)?;
            }
        }

        if composition.is_empty() {
            writeln!(out)?;
            writeln!(out, "No rules configured.")?;
            return Ok(());
        }

        writeln!(out)?;
        let width = composition
            .iter()
            .map(|(rule, _)| rule.as_str().len())
            .max()
            .unwrap_or(0);

        for (rule, resolved_rule) in composition.iter() {
            write!(out, "  ")?;
            write_severity(out, resolved_rule.setting.severity())?;
            write!(out, "  {:<width$}", rule.as_str(), width = width)?;
            write!(out, "  ")?;
            write_dimmed(out, &resolved_rule.source.to_string())?;
            if let Some(options) = options_suffix(&resolved_rule.setting) {
                write!(out, "  {}", options)?;
            }
            writeln!(out)?;
        }

        Ok(())
    }

    /// Write the provenance trace for one rule
    pub fn write_trace(&self, out: &mut dyn WriteColor, trace: &RuleTrace) -> io::Result<()> {
        let Some(effective) = trace.effective() else {
            writeln!(
                out,
                "Rule '{}' is not set by any provider or override.",
                trace.rule
            )?;
            return Ok(());
        };

        out.set_color(ColorSpec::new().set_bold(true))?;
        write!(out, "{}", trace.rule)?;
        out.reset()?;
        write!(out, ": ")?;
        write_severity(out, effective.setting.severity())?;
        writeln!(out, " (from {})", effective.source)?;
        writeln!(out)?;

        let width = trace
            .contributions
            .iter()
            .map(|c| c.source.to_string().len())
            .max()
            .unwrap_or(0);

        let last = trace.contributions.len() - 1;
        for (index, contribution) in trace.contributions.iter().enumerate() {
            write!(
                out,
                "  {:<width$}  ",
                contribution.source.to_string(),
                width = width
            )?;
            write_severity(out, contribution.setting.severity())?;
            if let Some(options) = options_suffix(&contribution.setting) {
                write!(out, " {}", options)?;
            }
            if index == last {
                writeln!(out, "  (effective)")?;
            } else {
                write!(out, "  ")?;
                write_dimmed(out, "(shadowed)")?;
                writeln!(out)?;
            }
        }

        Ok(())
    }

    /// Write registered providers, marking those the config extends
    pub fn write_providers(
        &self,
        out: &mut dyn WriteColor,
        registry: &ProviderRegistry,
        extends: &[ProviderId],
    ) -> io::Result<()> {
        if registry.is_empty() {
            writeln!(out, "No providers are registered.")?;
            return Ok(());
        }

        writeln!(out, "Providers ({} registered):", registry.len())?;

        for provider in registry.iter() {
            writeln!(out)?;
            out.set_color(ColorSpec::new().set_bold(true))?;
            write!(out, "{}", provider.id())?;
            out.reset()?;
            if let Some(position) = extends.iter().position(|id| id == provider.id()) {
                write!(out, " (extended, position {})", position + 1)?;
            }
            writeln!(out)?;

            if let Some(description) = provider.description() {
                writeln!(out, "  Description: {}", description)?;
            }
            writeln!(out, "  Rules: {}", provider.len())?;
            if let Some(path) = provider.source_path() {
                writeln!(out, "  Source: {}", path.display())?;
            }
        }

        Ok(())
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_severity(out: &mut dyn WriteColor, severity: Severity) -> io::Result<()> {
    let mut spec = ColorSpec::new();
    match severity {
        Severity::Error => {
            spec.set_fg(Some(Color::Red)).set_bold(true);
        }
        Severity::Warn => {
            spec.set_fg(Some(Color::Yellow));
        }
        Severity::Off => {
            spec.set_dimmed(true);
        }
    }
    out.set_color(&spec)?;
    write!(out, "{:<5}", severity.as_str())?;
    out.reset()
}

fn write_dimmed(out: &mut dyn WriteColor, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_dimmed(true))?;
    write!(out, "{}", text)?;
    out.reset()
}

fn options_suffix(setting: &RuleSetting) -> Option<String> {
    let options = setting.options();
    if options.is_empty() {
        return None;
    }
    serde_json::to_string(options).ok()
}

fn language_summary(language: &LanguageOptions) -> String {
    let mut parts = Vec::new();
    if let Some(parser) = &language.parser {
        parts.push(format!("parser {}", parser));
    }
    if let Some(version) = language.ecma_version {
        parts.push(format!("ecmaVersion {}", version));
    }
    if let Some(source_type) = language.source_type {
        parts.push(format!("sourceType {}", source_type));
    }
    parts.join(", ")
}

fn global_access_str(access: GlobalAccess) -> &'static str {
    match access {
        GlobalAccess::Readonly => "readonly",
        GlobalAccess::Writable => "writable",
        GlobalAccess::Off => "off",
    }
}
