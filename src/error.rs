//! Error types for rulestack
//!
//! This module defines the error types used throughout rulestack, following
//! a hierarchical structure with specific error variants for different
//! error categories.

use std::path::PathBuf;

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML syntax or shape
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but failed validation
    #[error("{0}")]
    Validation(String),
}

/// Composition-related errors
///
/// Composition either yields a complete effective map or fails with one of
/// these; there is no partial result.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// A rule setting is malformed or its severity is not off/warn/error
    #[error("Invalid setting for rule '{rule}' in {origin}: {reason}")]
    InvalidSetting {
        rule: String,
        origin: String,
        reason: String,
    },

    /// A provider identifier was referenced but never registered
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// A provider identifier was registered twice
    #[error("Duplicate provider identifier: {0}")]
    DuplicateProviderIdentifier(String),

    /// A provider definition file could not be read or parsed
    #[error("Invalid provider definition in {}: {message}", path.display())]
    InvalidProvider { path: PathBuf, message: String },
}

/// Top-level error type for rulestack
#[derive(Debug, thiserror::Error)]
pub enum RulestackError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Composition error
    #[error("Composition error: {0}")]
    Compose(#[from] ComposeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
