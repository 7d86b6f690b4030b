use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::module::ModuleManifest;

/// Per-file metadata recorded by the installer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstalledFile {
    /// Content checksum, when the installer computed one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    /// The install target the file was placed under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_to: Option<String>,
}

/// A module the manager has placed on disk: its manifest plus every file
/// it installed, keyed by game-root-relative path in extraction order.
///
/// Path keys are unique within one record; the installer keeps them unique
/// across the whole registry when it installs, so the registry does not
/// re-check on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledModule {
    module: ModuleManifest,
    #[serde(default)]
    files: IndexMap<String, InstalledFile>,
}

impl InstalledModule {
    pub fn new(module: ModuleManifest, files: IndexMap<String, InstalledFile>) -> Self {
        Self { module, files }
    }

    pub fn module(&self) -> &ModuleManifest {
        &self.module
    }

    pub fn identifier(&self) -> &str {
        &self.module.identifier
    }

    /// Installed paths with their metadata, in extraction order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &InstalledFile)> {
        self.files.iter().map(|(path, file)| (path.as_str(), file))
    }

    /// Whether this record owns `path`. Install records hold paths
    /// relative to the game root while auto-detection hands us absolute
    /// scan paths, so a `/`-boundary suffix match counts as ownership too.
    pub fn owns_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
            || self
                .files
                .keys()
                .any(|key| path.ends_with(key) && path[..path.len() - key.len()].ends_with('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modkit_version::ModVersion;

    fn installed(identifier: &str, paths: &[&str]) -> InstalledModule {
        let manifest =
            ModuleManifest::new(identifier, ModVersion::new("1.0").unwrap());
        let files = paths
            .iter()
            .map(|p| (p.to_string(), InstalledFile::default()))
            .collect();
        InstalledModule::new(manifest, files)
    }

    #[test]
    fn test_owns_file_exact() {
        let im = installed("FooMod", &["GameData/FooMod/Plugins/FooMod.dll"]);
        assert!(im.owns_file("GameData/FooMod/Plugins/FooMod.dll"));
        assert!(!im.owns_file("GameData/BarMod/BarMod.dll"));
    }

    #[test]
    fn test_owns_file_absolute_suffix() {
        let im = installed("FooMod", &["GameData/FooMod/Plugins/FooMod.dll"]);
        assert!(im.owns_file("/home/u/KSP/GameData/FooMod/Plugins/FooMod.dll"));
        // Suffix matches only on a path-segment boundary.
        assert!(!im.owns_file("/home/u/KSP/OtherGameData/FooMod/Plugins/FooMod.dll"));
    }

    #[test]
    fn test_files_preserve_order() {
        let im = installed("FooMod", &["GameData/FooMod/b.cfg", "GameData/FooMod/a.cfg"]);
        let paths: Vec<&str> = im.files().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["GameData/FooMod/b.cfg", "GameData/FooMod/a.cfg"]);
    }
}
