#![forbid(unsafe_code)]

//! Provider registry for managing and resolving rule providers
//!
//! The ProviderRegistry is responsible for:
//! - Registering providers built in code
//! - Loading provider definition files from directories
//! - Rejecting duplicate provider identifiers
//! - Resolving ordered identifier lists to providers

use crate::error::ComposeError;
use crate::rules::provider::RuleProvider;
use crate::types::ProviderId;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Registry owning all known rule providers, keyed by identifier
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<ProviderId, RuleProvider>,
}

impl ProviderRegistry {
    /// Create a new empty ProviderRegistry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::DuplicateProviderIdentifier` if a provider with the
    /// same identifier is already registered. The existing registration is kept.
    pub fn register(&mut self, provider: RuleProvider) -> Result<(), ComposeError> {
        let id = provider.id().clone();
        if self.providers.contains_key(&id) {
            return Err(ComposeError::DuplicateProviderIdentifier(id.to_string()));
        }

        debug!("Registered provider '{}' ({} rules)", id, provider.len());
        self.providers.insert(id, provider);
        Ok(())
    }

    /// Load every provider definition file in a directory
    ///
    /// Files with a `.toml` or `.json` extension are loaded in file-name order.
    /// If the directory doesn't exist, a warning is logged but the operation
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError` if:
    /// - The path exists but is not a directory
    /// - A definition file cannot be read or parsed
    /// - A rule setting is invalid
    /// - A provider identifier is already registered
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ComposeError> {
        if !dir.exists() {
            warn!("Provider directory does not exist: {}", dir.display());
            return Ok(0);
        }

        if !dir.is_dir() {
            return Err(ComposeError::InvalidProvider {
                path: dir.to_path_buf(),
                message: "path is not a directory".to_string(),
            });
        }

        let entries = fs::read_dir(dir).map_err(|e| ComposeError::InvalidProvider {
            path: dir.to_path_buf(),
            message: format!("failed to read directory: {}", e),
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ComposeError::InvalidProvider {
                path: dir.to_path_buf(),
                message: format!("failed to read directory entry: {}", e),
            })?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("toml") | Some("json")
            ) {
                paths.push(path);
            }
        }

        // read_dir order is platform-dependent
        paths.sort();

        let mut loaded = 0;
        for path in &paths {
            let provider = RuleProvider::from_path(path)?;
            self.register(provider)?;
            loaded += 1;
        }

        debug!("Loaded {} provider(s) from {}", loaded, dir.display());
        Ok(loaded)
    }

    /// Resolve identifiers to providers, preserving the given order
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::UnknownProvider` for the first identifier that was
    /// never registered.
    pub fn resolve(&self, ids: &[ProviderId]) -> Result<Vec<&RuleProvider>, ComposeError> {
        ids.iter()
            .map(|id| {
                self.providers
                    .get(id)
                    .ok_or_else(|| ComposeError::UnknownProvider(id.to_string()))
            })
            .collect()
    }

    /// Get a provider by its identifier
    pub fn get(&self, id: &ProviderId) -> Option<&RuleProvider> {
        self.providers.get(id)
    }

    /// Iterate over all providers in identifier order
    pub fn iter(&self) -> impl Iterator<Item = &RuleProvider> {
        self.providers.values()
    }

    /// Get the number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
