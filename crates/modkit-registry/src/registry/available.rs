use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use modkit_version::{GameVersion, ModVersion};

use crate::module::ModuleManifest;
use crate::{RegistryError, Result};

/// All known releases of a single identifier, keyed by release version.
///
/// The version ordering is total on real versions, so "the latest release
/// compatible with host H" is a reverse scan; ties cannot arise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableModule {
    identifier: String,
    releases: BTreeMap<ModVersion, ModuleManifest>,
}

impl AvailableModule {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            releases: BTreeMap::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Insert a release keyed on its own version, overwriting any release
    /// already stored under that version. Every release stored here must
    /// carry this collection's identifier.
    pub fn add(&mut self, manifest: ModuleManifest) -> Result<()> {
        if manifest.identifier != self.identifier {
            return Err(RegistryError::IdentifierMismatch {
                expected: self.identifier.clone(),
                found: manifest.identifier,
            });
        }

        self.releases.insert(manifest.version.clone(), manifest);
        Ok(())
    }

    /// Remove the release stored under `version`; reports whether one was
    /// there. No-op when absent.
    pub fn remove(&mut self, version: &ModVersion) -> bool {
        self.releases.remove(version).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /// All releases in ascending version order.
    pub fn releases(&self) -> impl Iterator<Item = &ModuleManifest> {
        self.releases.values()
    }

    /// The greatest-version release compatible with `host`; `None` host
    /// means any release qualifies.
    pub fn latest(&self, host: Option<&GameVersion>) -> Option<&ModuleManifest> {
        self.releases
            .values()
            .rev()
            .find(|manifest| manifest.compatible_with(host))
    }
}
