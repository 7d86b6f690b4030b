//! Set-level consistency checks over installed modules.
//!
//! Everything here is pure: the outcome depends only on the module set and
//! the auto-detected DLL identifiers, never on iteration order or registry
//! state.

use std::collections::{BTreeMap, BTreeSet};

use crate::module::{ModuleManifest, RelationshipEntry};
use crate::{RegistryError, Result};

/// Whether `dependency` is satisfied within the module set.
///
/// Three sources of truth, consulted uniformly by every caller: a module
/// with the right identifier and a matching real version, a module that
/// provides the identifier (no version to check), or an auto-detected DLL
/// of that name (version unknown, identifier match is enough).
pub fn dependency_satisfied(
    dependency: &RelationshipEntry,
    modules: &[&ModuleManifest],
    dlls: &BTreeSet<String>,
) -> bool {
    for module in modules {
        if module.identifier == dependency.name
            && dependency.version_satisfied_by(&module.version)
        {
            return true;
        }
        if module.provides.iter().any(|p| *p == dependency.name) {
            return true;
        }
    }

    dlls.contains(&dependency.name)
}

/// Every unmet dependency in the set, as a mapping from the missing
/// identifier to the identifiers of the modules that need it. Empty means
/// all dependencies are satisfied.
pub fn unmet_dependencies(
    modules: &[&ModuleManifest],
    dlls: &BTreeSet<String>,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut unmet: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for module in modules {
        for dependency in &module.depends {
            if !dependency_satisfied(dependency, modules, dlls) {
                unmet
                    .entry(dependency.name.clone())
                    .or_default()
                    .insert(module.identifier.clone());
            }
        }
    }

    unmet
}

/// Every conflicting pair in the set. A pair conflicts when either side
/// declares a `conflicts` entry matching the other's identifier (with
/// version constraints applied to its real version) or one of its provided
/// identifiers. Each unordered pair is reported once.
pub fn conflicts(modules: &[&ModuleManifest]) -> Vec<(String, String)> {
    let mut found = Vec::new();

    for (i, a) in modules.iter().enumerate() {
        for b in &modules[i + 1..] {
            if conflicts_with(a, b) || conflicts_with(b, a) {
                found.push((a.identifier.clone(), b.identifier.clone()));
            }
        }
    }

    found
}

/// Whether `module` declares a conflict matching `other`.
fn conflicts_with(module: &ModuleManifest, other: &ModuleManifest) -> bool {
    module.conflicts.iter().any(|entry| {
        if entry.name == other.identifier {
            entry.version_satisfied_by(&other.version)
        } else {
            other.provides.iter().any(|p| *p == entry.name)
        }
    })
}

/// Fails with [`RegistryError::Inconsistent`] when the set has any unmet
/// dependency or any conflicting pair; the error carries both lists.
pub fn check_consistency(modules: &[&ModuleManifest], dlls: &BTreeSet<String>) -> Result<()> {
    let unmet = unmet_dependencies(modules, dlls);
    let conflicts = conflicts(modules);

    if unmet.is_empty() && conflicts.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::Inconsistent { unmet, conflicts })
    }
}
