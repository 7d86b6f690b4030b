//! Registry scenario tests exercising the full query surface: catalog
//! compatibility listings, provides-aware lookup, DLL auto-detection, and
//! removal-consequence analysis.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use modkit_version::{GameVersion, ModVersion};

use super::*;
use crate::module::{ModuleManifest, RelationshipEntry, Version};
use crate::RegistryError;

fn mv(s: &str) -> ModVersion {
    ModVersion::new(s).unwrap()
}

fn gv(s: &str) -> GameVersion {
    GameVersion::new(s).unwrap()
}

/// Manifest with a given identifier and version, compatible with any host.
fn manifest(identifier: &str, version: &str) -> ModuleManifest {
    ModuleManifest::new(identifier, mv(version))
}

/// Manifest pinned to an exact host game version.
fn manifest_for_game(identifier: &str, version: &str, game_version: &str) -> ModuleManifest {
    let mut m = manifest(identifier, version);
    m.game_version = Some(gv(game_version));
    m
}

fn with_depends(mut m: ModuleManifest, depends: &[&str]) -> ModuleManifest {
    for name in depends {
        m.depends.push(RelationshipEntry::new(*name));
    }
    m
}

fn with_provides(mut m: ModuleManifest, provides: &[&str]) -> ModuleManifest {
    for name in provides {
        m.provides.push(name.to_string());
    }
    m
}

/// Install record with no files.
fn installed(m: ModuleManifest) -> InstalledModule {
    InstalledModule::new(m, IndexMap::new())
}

/// Install record owning the given game-root-relative paths.
fn installed_with_files(m: ModuleManifest, paths: &[&str]) -> InstalledModule {
    let files = paths
        .iter()
        .map(|p| (p.to_string(), InstalledFile::default()))
        .collect();
    InstalledModule::new(m, files)
}

fn identifiers<'a>(manifests: &'a [&'a ModuleManifest]) -> Vec<&'a str> {
    manifests.iter().map(|m| m.identifier.as_str()).collect()
}

fn seed(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// DLL auto-detection
// ============================================================================

#[test]
fn test_register_dll_classifies_path() {
    let mut registry = Registry::empty();
    registry.register_dll("/home/u/KSP/GameData/FooMod/Plugins/FooMod.dll");

    assert_eq!(
        registry.installed_dlls().get("FooMod").map(String::as_str),
        Some("FooMod/Plugins/FooMod.dll")
    );
    assert_eq!(registry.installed_version("FooMod"), Some(Version::Dll));
}

#[test]
fn test_register_dll_shadowed_by_installed_module() {
    let mut registry = Registry::empty();
    registry
        .register_module(installed_with_files(
            manifest("FooMod", "1.0"),
            &["GameData/FooMod/Plugins/FooMod.dll"],
        ))
        .unwrap();

    registry.register_dll("/home/u/KSP/GameData/FooMod/Plugins/FooMod.dll");
    assert!(registry.installed_dlls().is_empty());
}

#[test]
fn test_register_dll_ignores_unclassifiable_paths() {
    let mut registry = Registry::empty();
    registry.register_dll("/home/u/KSP/Plugins/FooMod.dll");
    registry.register_dll("/home/u/KSP/GameData/FooMod/.dll");

    assert!(registry.installed_dlls().is_empty());
}

#[test]
fn test_register_dll_idempotent() {
    let mut registry = Registry::empty();
    registry.register_dll("/ksp/GameData/FooMod/FooMod.dll");
    let first = registry.clone();

    registry.register_dll("/ksp/GameData/FooMod/FooMod.dll");
    assert_eq!(registry, first);
}

#[test]
fn test_clear_dlls() {
    let mut registry = Registry::empty();
    registry.register_dll("/ksp/GameData/FooMod/FooMod.dll");
    registry.clear_dlls();

    assert!(registry.installed_dlls().is_empty());
    assert!(!registry.is_installed("FooMod"));
}

// ============================================================================
// Available index and compatibility
// ============================================================================

#[test]
fn test_available_sorted_and_filtered_by_host() {
    let mut registry = Registry::empty();
    registry
        .add_available(manifest_for_game("Beta", "1.0", "1.0"))
        .unwrap();
    registry
        .add_available(manifest_for_game("Alpha", "1.0", "1.0"))
        .unwrap();
    registry
        .add_available(manifest_for_game("Gamma", "1.0", "2.0"))
        .unwrap();

    let host = gv("1.0");
    assert_eq!(
        identifiers(&registry.available(Some(&host))),
        vec!["Alpha", "Beta"]
    );
}

#[test]
fn test_incompatible_lists_overall_latest() {
    let mut registry = Registry::empty();
    // A has a release for host 1.0, B only for host 2.0.
    registry
        .add_available(manifest_for_game("A", "1.0", "1.0"))
        .unwrap();
    registry
        .add_available(manifest_for_game("B", "0.9", "2.0"))
        .unwrap();

    let host = gv("1.0");
    assert_eq!(identifiers(&registry.available(Some(&host))), vec!["A"]);
    let incompatible = registry.incompatible(Some(&host));
    assert_eq!(identifiers(&incompatible), vec!["B"]);
    assert_eq!(incompatible[0].version, mv("0.9"));
}

#[test]
fn test_available_excludes_unsatisfiable_dependencies() {
    let mut registry = Registry::empty();
    registry
        .add_available(with_depends(manifest("Needy", "1.0"), &["Missing"]))
        .unwrap();
    registry
        .add_available(with_depends(manifest("Happy", "1.0"), &["Helper"]))
        .unwrap();
    registry.add_available(manifest("Helper", "1.0")).unwrap();

    assert_eq!(identifiers(&registry.available(None)), vec!["Happy", "Helper"]);
}

#[test]
fn test_available_dependency_met_via_provides() {
    let mut registry = Registry::empty();
    registry
        .add_available(with_depends(manifest("Needy", "1.0"), &["Virtual"]))
        .unwrap();
    registry
        .add_available(with_provides(manifest("Provider", "1.0"), &["Virtual"]))
        .unwrap();

    assert_eq!(
        identifiers(&registry.available(None)),
        vec!["Needy", "Provider"]
    );
}

#[test]
fn test_available_dependency_incompatible_for_host_excludes_candidate() {
    let mut registry = Registry::empty();
    registry
        .add_available(with_depends(manifest("Needy", "1.0"), &["Helper"]))
        .unwrap();
    registry
        .add_available(manifest_for_game("Helper", "1.0", "2.0"))
        .unwrap();

    // Helper exists but has no release for host 1.0.
    assert!(identifiers(&registry.available(Some(&gv("1.0")))).is_empty());
    assert_eq!(
        identifiers(&registry.available(Some(&gv("2.0")))),
        vec!["Helper", "Needy"]
    );
}

#[test]
fn test_latest_available_unknown_identifier() {
    let registry = Registry::empty();
    assert_eq!(
        registry.latest_available("Ghost", None),
        Err(RegistryError::ModuleNotFound {
            identifier: "Ghost".to_string()
        })
    );
}

#[test]
fn test_latest_available_known_but_incompatible() {
    let mut registry = Registry::empty();
    registry
        .add_available(manifest_for_game("A", "1.0", "2.0"))
        .unwrap();

    assert_eq!(registry.latest_available("A", Some(&gv("1.0"))), Ok(None));
}

#[test]
fn test_remove_available_last_release_forgets_identifier() {
    let mut registry = Registry::empty();
    registry.add_available(manifest("A", "1.0")).unwrap();
    registry.remove_available("A", &mv("1.0"));

    assert!(matches!(
        registry.latest_available("A", None),
        Err(RegistryError::ModuleNotFound { .. })
    ));

    // No-ops for unknown identifier or version.
    registry.remove_available("A", &mv("1.0"));
    registry.remove_available("Ghost", &mv("1.0"));
}

#[test]
fn test_clear_available_leaves_installed_alone() {
    let mut registry = Registry::empty();
    registry.add_available(manifest("A", "1.0")).unwrap();
    registry.register_module(installed(manifest("B", "1.0"))).unwrap();
    registry.clear_available();

    assert!(registry.available(None).is_empty());
    assert!(registry.is_installed("B"));
}

// ============================================================================
// Provides-aware lookup
// ============================================================================

#[test]
fn test_latest_available_with_provides_collects_providers() {
    let mut registry = Registry::empty();
    registry
        .add_available(with_provides(manifest("A", "1.0"), &["Virtual"]))
        .unwrap();
    registry
        .add_available(with_provides(manifest("B", "2.0"), &["Virtual"]))
        .unwrap();

    let supplying = registry.latest_available_with_provides("Virtual", None);
    assert_eq!(identifiers(&supplying), vec!["A", "B"]);

    // The virtual identifier itself is not a catalog module.
    assert!(matches!(
        registry.latest_available("Virtual", None),
        Err(RegistryError::ModuleNotFound { .. })
    ));
}

#[test]
fn test_latest_available_with_provides_self_and_provider() {
    let mut registry = Registry::empty();
    // A module that both is and provides the identifier appears twice.
    registry
        .add_available(with_provides(manifest("Foo", "1.0"), &["Foo"]))
        .unwrap();

    let supplying = registry.latest_available_with_provides("Foo", None);
    assert_eq!(identifiers(&supplying), vec!["Foo", "Foo"]);
}

#[test]
fn test_latest_available_with_provides_respects_host() {
    let mut registry = Registry::empty();
    registry
        .add_available(with_provides(
            manifest_for_game("A", "1.0", "1.0"),
            &["Virtual"],
        ))
        .unwrap();
    registry
        .add_available(with_provides(
            manifest_for_game("B", "2.0", "2.0"),
            &["Virtual"],
        ))
        .unwrap();

    assert_eq!(
        identifiers(&registry.latest_available_with_provides("Virtual", Some(&gv("1.0")))),
        vec!["A"]
    );
    assert!(registry
        .latest_available_with_provides("Virtual", Some(&gv("3.0")))
        .is_empty());
}

// ============================================================================
// Installation state
// ============================================================================

#[test]
fn test_register_module_duplicate_is_an_error() {
    let mut registry = Registry::empty();
    registry.register_module(installed(manifest("A", "1.0"))).unwrap();

    let err = registry
        .register_module(installed(manifest("A", "2.0")))
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::AlreadyInstalled {
            identifier: "A".to_string()
        }
    );

    // The original registration is untouched.
    assert_eq!(
        registry.installed_version("A"),
        Some(Version::Real(mv("1.0")))
    );
}

#[test]
fn test_deregister_module() {
    let mut registry = Registry::empty();
    registry.register_module(installed(manifest("A", "1.0"))).unwrap();
    registry.deregister_module("A");
    registry.deregister_module("A");

    assert!(!registry.is_installed("A"));
}

#[test]
fn test_installed_version_precedence() {
    let mut registry = Registry::empty();

    // Provided only.
    registry
        .register_module(installed(with_provides(manifest("P", "1.0"), &["X"])))
        .unwrap();
    assert_eq!(
        registry.installed_version("X"),
        Some(Version::Provides("P".to_string()))
    );

    // A DLL named X outranks the provided identifier.
    registry.register_dll("/ksp/GameData/X/X.dll");
    assert_eq!(registry.installed_version("X"), Some(Version::Dll));

    // A real install outranks both.
    registry.register_module(installed(manifest("X", "2.0"))).unwrap();
    assert_eq!(
        registry.installed_version("X"),
        Some(Version::Real(mv("2.0")))
    );

    assert_eq!(registry.installed_version("Ghost"), None);
    assert!(!registry.is_installed("Ghost"));
}

#[test]
fn test_installed_overlay_order() {
    let mut registry = Registry::empty();
    registry.register_dll("/ksp/GameData/DllOnly/DllOnly.dll");
    registry.register_dll("/ksp/GameData/Shadowed/Shadowed.dll");
    registry
        .register_module(installed(with_provides(
            manifest("Real", "1.0"),
            &["Virtual", "Shadowed"],
        )))
        .unwrap();

    let all = registry.installed();
    assert_eq!(all["DllOnly"], Version::Dll);
    assert_eq!(all["Real"], Version::Real(mv("1.0")));
    assert_eq!(all["Virtual"], Version::Provides("Real".to_string()));
    // Provides overlays the DLL of the same name.
    assert_eq!(all["Shadowed"], Version::Provides("Real".to_string()));

    // Idempotent without intervening mutation.
    assert_eq!(registry.installed(), all);
}

#[test]
fn test_provided_greatest_provider_wins() {
    let mut registry = Registry::empty();
    registry
        .register_module(installed(with_provides(manifest("Zed", "1.0"), &["Virtual"])))
        .unwrap();
    registry
        .register_module(installed(with_provides(manifest("Abel", "1.0"), &["Virtual"])))
        .unwrap();

    // Providers are visited in identifier order; the last write wins.
    assert_eq!(
        registry.provided().get("Virtual").map(String::as_str),
        Some("Zed")
    );
    assert_eq!(
        registry.installed_version("Virtual"),
        Some(Version::Provides("Zed".to_string()))
    );
}

// ============================================================================
// Sanity and removal
// ============================================================================

#[test]
fn test_check_sanity_spots_missing_dependency() {
    let mut registry = Registry::empty();
    registry
        .register_module(installed(with_depends(manifest("A", "1.0"), &["B"])))
        .unwrap();

    match registry.check_sanity().unwrap_err() {
        RegistryError::Inconsistent { unmet, conflicts } => {
            assert!(unmet.contains_key("B"));
            assert!(conflicts.is_empty());
        }
        other => panic!("expected Inconsistent, got {other:?}"),
    }

    // A DLL named B satisfies the dependency.
    registry.register_dll("/ksp/GameData/B/B.dll");
    assert!(registry.check_sanity().is_ok());
}

#[test]
fn test_find_reverse_dependencies_chain() {
    let mut registry = Registry::empty();
    registry
        .register_module(installed(with_depends(manifest("A", "1.0"), &["B"])))
        .unwrap();
    registry
        .register_module(installed(with_depends(manifest("B", "1.0"), &["C"])))
        .unwrap();
    registry.register_module(installed(manifest("C", "1.0"))).unwrap();

    assert_eq!(
        registry.find_reverse_dependencies(&seed(&["C"])),
        seed(&["A", "B", "C"])
    );
}

#[test]
fn test_find_reverse_dependencies_stops_at_independent_modules() {
    let mut registry = Registry::empty();
    registry.register_module(installed(manifest("A", "1.0"))).unwrap();
    registry.register_module(installed(manifest("B", "1.0"))).unwrap();

    assert_eq!(registry.find_reverse_dependencies(&seed(&["A"])), seed(&["A"]));
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_json_round_trip() {
    let mut registry = Registry::empty();
    registry
        .add_available(manifest_for_game("A", "1.0", "1.0"))
        .unwrap();
    registry.add_available(manifest("A", "1.1")).unwrap();
    registry
        .register_module(installed_with_files(
            with_provides(manifest("B", "2.0"), &["Virtual"]),
            &["GameData/B/B.cfg"],
        ))
        .unwrap();
    registry.register_dll("/ksp/GameData/C/C.dll");

    let json = registry.to_json().unwrap();
    let restored = Registry::from_json(&json).unwrap();
    assert_eq!(restored, registry);
}

#[test]
fn test_from_json_rejects_other_versions() {
    let json = r#"{"registry_version": 2}"#;
    assert_eq!(
        Registry::from_json(json),
        Err(RegistryError::UnsupportedRegistryVersion { version: 2 })
    );

    let json = r#"{"registry_version": 4}"#;
    assert!(matches!(
        Registry::from_json(json),
        Err(RegistryError::UnsupportedRegistryVersion { version: 4 })
    ));
}

#[test]
fn test_from_json_rejects_garbage() {
    assert!(matches!(
        Registry::from_json("not json"),
        Err(RegistryError::Serialization(_))
    ));
}

#[test]
fn test_from_json_minimal_state() {
    let json = r#"{"registry_version": 3}"#;
    let registry = Registry::from_json(json).unwrap();
    assert_eq!(registry, Registry::empty());
}
