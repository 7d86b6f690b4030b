use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use modkit_version::{GameVersion, ModVersion};

use super::{classify_dll_path, AvailableModule, InstalledModule};
use crate::module::{ModuleManifest, Version};
use crate::{sanity, RegistryError, Result};

/// The registry schema version this build reads and writes.
pub const CURRENT_REGISTRY_VERSION: u32 = 3;

/// Aggregate root over the three module universes: catalog-advertised
/// releases, manager-installed modules, and auto-detected plugin DLLs.
///
/// One identifier may legitimately appear in both the installed index and
/// the DLL index; queries prefer the install record. Provided (virtual)
/// identifiers are always derived from installed modules on demand, never
/// stored. All operations are synchronous and the registry does no I/O;
/// callers serialize access and handle persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registry {
    registry_version: u32,
    available: BTreeMap<String, AvailableModule>,
    installed: BTreeMap<String, InstalledModule>,
    /// Auto-detected mod name -> path relative to the game-data root
    installed_dlls: BTreeMap<String, String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::empty()
    }
}

impl Registry {
    /// A registry with no modules in any index.
    pub fn empty() -> Self {
        Self {
            registry_version: CURRENT_REGISTRY_VERSION,
            available: BTreeMap::new(),
            installed: BTreeMap::new(),
            installed_dlls: BTreeMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Restore a registry from its serialized form, rejecting any schema
    /// version other than [`CURRENT_REGISTRY_VERSION`].
    pub fn from_json(json: &str) -> Result<Self> {
        let state: RegistryState =
            serde_json::from_str(json).map_err(|e| RegistryError::Serialization(e.to_string()))?;

        if state.registry_version != CURRENT_REGISTRY_VERSION {
            return Err(RegistryError::UnsupportedRegistryVersion {
                version: state.registry_version,
            });
        }

        Ok(Self {
            registry_version: state.registry_version,
            available: state.available,
            installed: state.installed,
            installed_dlls: state.installed_dlls,
        })
    }

    /// Serialize the three indices and the schema version.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RegistryError::Serialization(e.to_string()))
    }

    // ------------------------------------------------------------------
    // Mutation: available index
    // ------------------------------------------------------------------

    /// Record a catalog release, creating the identifier's release set on
    /// first sight. A release with the same identifier and version
    /// overwrites the previous one.
    pub fn add_available(&mut self, manifest: ModuleManifest) -> Result<()> {
        log::debug!("registering available {}", manifest.pretty_string());
        self.available
            .entry(manifest.identifier.clone())
            .or_insert_with(|| AvailableModule::new(manifest.identifier.clone()))
            .add(manifest)
    }

    /// Forget one catalog release. No-op for an unknown identifier or
    /// version; dropping the last release drops the identifier entirely.
    pub fn remove_available(&mut self, identifier: &str, version: &ModVersion) {
        if let Some(available) = self.available.get_mut(identifier) {
            available.remove(version);
            if available.is_empty() {
                self.available.remove(identifier);
            }
        }
    }

    /// Reset the whole available index, e.g. before a catalog refresh.
    /// Installed and DLL indices are untouched.
    pub fn clear_available(&mut self) {
        self.available.clear();
    }

    // ------------------------------------------------------------------
    // Mutation: installed index
    // ------------------------------------------------------------------

    /// Record a completed install. The identifier must not already have an
    /// install record; re-registering is a caller bug surfaced as
    /// [`RegistryError::AlreadyInstalled`].
    pub fn register_module(&mut self, installed: InstalledModule) -> Result<()> {
        let identifier = installed.identifier().to_string();
        if self.installed.contains_key(&identifier) {
            return Err(RegistryError::AlreadyInstalled { identifier });
        }

        log::debug!("registering installed {}", installed.module().pretty_string());
        self.installed.insert(identifier, installed);
        Ok(())
    }

    /// Drop an install record. No-op when absent. Files on disk are the
    /// uninstaller's responsibility, not the registry's.
    pub fn deregister_module(&mut self, identifier: &str) {
        if self.installed.remove(identifier).is_some() {
            log::debug!("deregistered {identifier}");
        }
    }

    // ------------------------------------------------------------------
    // Mutation: DLL index
    // ------------------------------------------------------------------

    /// Record an auto-detected plugin file found by a filesystem scan.
    ///
    /// Paths already owned by an installed module are ignored (the install
    /// record is authoritative). Paths the classifier cannot place under a
    /// `GameData/` layout are logged and ignored. A later registration for
    /// the same mod name overwrites the earlier path.
    pub fn register_dll(&mut self, path: &str) {
        if self.installed.values().any(|im| im.owns_file(path)) {
            log::debug!("{path} belongs to an installed module, not registering");
            return;
        }

        match classify_dll_path(path) {
            Some(location) => {
                log::debug!("autodetected {} at {}", location.mod_name, location.relative_path);
                self.installed_dlls
                    .insert(location.mod_name, location.relative_path);
            }
            None => log::warn!("unusable dll path, ignoring: {path}"),
        }
    }

    /// Forget all auto-detected DLLs, e.g. before a rescan.
    pub fn clear_dlls(&mut self) {
        self.installed_dlls.clear();
    }

    // ------------------------------------------------------------------
    // Queries: installation state
    // ------------------------------------------------------------------

    /// The version under which `identifier` is present, preferring a real
    /// install record over an auto-detected DLL over a provided (virtual)
    /// identifier. `None` when it is not present at all.
    pub fn installed_version(&self, identifier: &str) -> Option<Version> {
        if let Some(installed) = self.installed.get(identifier) {
            return Some(Version::Real(installed.module().version.clone()));
        }
        if self.installed_dlls.contains_key(identifier) {
            return Some(Version::Dll);
        }
        self.provided().remove(identifier).map(Version::Provides)
    }

    /// Whether `identifier` is present in any of the three universes.
    pub fn is_installed(&self, identifier: &str) -> bool {
        self.installed_version(identifier).is_some()
    }

    /// Everything present, as identifier -> version. Real installs win
    /// over provided identifiers, which win over auto-detected DLLs.
    pub fn installed(&self) -> BTreeMap<String, Version> {
        let mut all = BTreeMap::new();

        for name in self.installed_dlls.keys() {
            all.insert(name.clone(), Version::Dll);
        }
        for (virtual_identifier, provider) in self.provided() {
            all.insert(virtual_identifier, Version::Provides(provider));
        }
        for (identifier, installed) in &self.installed {
            all.insert(
                identifier.clone(),
                Version::Real(installed.module().version.clone()),
            );
        }

        all
    }

    /// Every virtual identifier supplied by an installed module, mapped to
    /// its provider's identifier. When several installed modules provide
    /// the same identifier, the lexicographically greatest provider wins
    /// (installed modules are visited in identifier order; the last write
    /// sticks).
    pub fn provided(&self) -> BTreeMap<String, String> {
        let mut provided = BTreeMap::new();

        for (identifier, installed) in &self.installed {
            for virtual_identifier in &installed.module().provides {
                provided.insert(virtual_identifier.clone(), identifier.clone());
            }
        }

        provided
    }

    /// Install records, in identifier order.
    pub fn installed_modules(&self) -> impl Iterator<Item = &InstalledModule> {
        self.installed.values()
    }

    /// Auto-detected DLLs as mod name -> relative path.
    pub fn installed_dlls(&self) -> &BTreeMap<String, String> {
        &self.installed_dlls
    }

    // ------------------------------------------------------------------
    // Queries: catalog
    // ------------------------------------------------------------------

    /// The latest host-compatible release of `identifier`, or `None` when
    /// every release is incompatible. An identifier the catalog has never
    /// advertised is an error, distinct from "known but incompatible".
    pub fn latest_available(
        &self,
        identifier: &str,
        host: Option<&GameVersion>,
    ) -> Result<Option<&ModuleManifest>> {
        match self.available.get(identifier) {
            Some(available) => Ok(available.latest(host)),
            None => Err(RegistryError::ModuleNotFound {
                identifier: identifier.to_string(),
            }),
        }
    }

    /// Every latest host-compatible release that supplies `identifier`:
    /// the identifier's own latest release (when the catalog knows it at
    /// all) followed by the latest release of each module providing it
    /// virtually. A module that both is and provides the identifier
    /// appears twice; callers that care deduplicate.
    pub fn latest_available_with_provides(
        &self,
        identifier: &str,
        host: Option<&GameVersion>,
    ) -> Vec<&ModuleManifest> {
        let mut supplying = Vec::new();

        // Unknown identifiers are fine here: they may exist only virtually.
        if let Ok(Some(manifest)) = self.latest_available(identifier, host) {
            supplying.push(manifest);
        }

        for available in self.available.values() {
            if let Some(manifest) = available.latest(host) {
                if manifest.provides.iter().any(|p| p == identifier) {
                    supplying.push(manifest);
                }
            }
        }

        supplying
    }

    /// Latest installable releases for the host, alphabetically by
    /// identifier: the latest compatible release of every identifier whose
    /// hard dependencies can all be supplied by some compatible release.
    pub fn available(&self, host: Option<&GameVersion>) -> Vec<&ModuleManifest> {
        self.available
            .values()
            .filter_map(|available| available.latest(host))
            .filter(|manifest| {
                manifest.depends.iter().all(|dependency| {
                    !self
                        .latest_available_with_provides(&dependency.name, host)
                        .is_empty()
                })
            })
            .collect()
    }

    /// For every identifier with no host-compatible release at all, its
    /// overall latest release, alphabetically by identifier. Disjoint from
    /// [`Registry::available`] by construction.
    pub fn incompatible(&self, host: Option<&GameVersion>) -> Vec<&ModuleManifest> {
        self.available
            .values()
            .filter(|available| available.latest(host).is_none())
            .filter_map(|available| available.latest(None))
            .collect()
    }

    // ------------------------------------------------------------------
    // Queries: consistency
    // ------------------------------------------------------------------

    /// Check that every installed module's dependencies are met and that
    /// no two installed modules conflict, counting auto-detected DLLs as
    /// dependency satisfiers.
    pub fn check_sanity(&self) -> Result<()> {
        let modules: Vec<&ModuleManifest> =
            self.installed.values().map(|im| im.module()).collect();
        sanity::check_consistency(&modules, &self.dll_identifiers())
    }

    /// What else would have to be removed if `seed` were removed; see
    /// [`crate::find_reverse_dependencies`].
    pub fn find_reverse_dependencies(&self, seed: &BTreeSet<String>) -> BTreeSet<String> {
        let modules: Vec<&ModuleManifest> =
            self.installed.values().map(|im| im.module()).collect();
        crate::find_reverse_dependencies(seed, &modules, &self.dll_identifiers())
    }

    fn dll_identifiers(&self) -> BTreeSet<String> {
        self.installed_dlls.keys().cloned().collect()
    }
}

/// Serialized shape; deserialization goes through [`Registry::from_json`]
/// so the schema version is always checked.
#[derive(Deserialize)]
struct RegistryState {
    registry_version: u32,
    #[serde(default)]
    available: BTreeMap<String, AvailableModule>,
    #[serde(default)]
    installed: BTreeMap<String, InstalledModule>,
    #[serde(default)]
    installed_dlls: BTreeMap<String, String>,
}
