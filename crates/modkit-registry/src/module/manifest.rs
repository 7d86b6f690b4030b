use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use modkit_version::{GameVersion, ModVersion};

use super::RelationshipEntry;

/// Release maturity declared by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    /// Regular release
    Stable,
    /// Pre-release offered for testing
    Testing,
    /// Development snapshot
    Development,
}

impl Default for ReleaseStatus {
    fn default() -> Self {
        ReleaseStatus::Stable
    }
}

/// What kind of thing a manifest describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// An installable mod with files of its own (default)
    Package,
    /// No files, only relationships
    MetaPackage,
    /// Official expansion content detected rather than installed
    Dlc,
}

impl Default for ModuleKind {
    fn default() -> Self {
        ModuleKind::Package
    }
}

/// One release of one mod, as advertised by a catalog.
///
/// Manifests are immutable once constructed; an identical manifest may be
/// held by the available index and by an install record at the same time,
/// so they are cheap value copies rather than shared handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Stable, case-sensitive name the registry keys on
    pub identifier: String,

    /// Release version; available releases always carry a real version
    pub version: ModVersion,

    /// Human-readable display name
    pub name: String,

    /// One-line description
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub authors: Vec<String>,

    /// License identifiers
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub license: Vec<String>,

    /// Archive URL; absent for metapackages and DLC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_size: Option<u64>,

    #[serde(default)]
    pub release_status: ReleaseStatus,

    #[serde(default)]
    pub kind: ModuleKind,

    /// Exact host compatibility: the declared version must be a prefix of
    /// the host version (`1.0` covers every `1.0.x` host)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_version: Option<GameVersion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_version_min: Option<GameVersion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_version_max: Option<GameVersion>,

    /// Hard requirements; the module is broken without them
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub depends: Vec<RelationshipEntry>,

    /// Modules that cannot be installed alongside this one
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub conflicts: Vec<RelationshipEntry>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub recommends: Vec<RelationshipEntry>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub suggests: Vec<RelationshipEntry>,

    /// Modules this release is known to work with (informational)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub supports: Vec<RelationshipEntry>,

    /// Virtual identifiers this release supplies
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub provides: Vec<String>,

    /// Named URLs (homepage, repository, bugtracker)
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub resources: IndexMap<String, String>,
}

impl ModuleManifest {
    /// Creates a manifest with the required fields; everything else starts
    /// empty. The display name defaults to the identifier.
    pub fn new(identifier: impl Into<String>, version: ModVersion) -> Self {
        let identifier = identifier.into();

        Self {
            name: identifier.clone(),
            identifier,
            version,
            abstract_: None,
            authors: Vec::new(),
            license: Vec::new(),
            download: None,
            download_size: None,
            release_status: ReleaseStatus::default(),
            kind: ModuleKind::default(),
            game_version: None,
            game_version_min: None,
            game_version_max: None,
            depends: Vec::new(),
            conflicts: Vec::new(),
            recommends: Vec::new(),
            suggests: Vec::new(),
            supports: Vec::new(),
            provides: Vec::new(),
            resources: IndexMap::new(),
        }
    }

    /// Whether this release runs on the given host version.
    ///
    /// `None` means "any host": both an absent host version and a manifest
    /// with no declared range always pass. An exact `game_version` uses
    /// prefix targeting; otherwise min and max bound the host, each
    /// optional.
    pub fn compatible_with(&self, host: Option<&GameVersion>) -> bool {
        let host = match host {
            Some(host) => host,
            None => return true,
        };

        if let Some(exact) = &self.game_version {
            return exact.targets(host);
        }

        if let Some(min) = &self.game_version_min {
            if !min.is_lower_bound_for(host) {
                return false;
            }
        }
        if let Some(max) = &self.game_version_max {
            if !max.is_upper_bound_for(host) {
                return false;
            }
        }

        true
    }

    /// True when this release supplies `identifier`, either by being it or
    /// by providing it virtually.
    pub fn supplies(&self, identifier: &str) -> bool {
        self.identifier == identifier || self.provides.iter().any(|p| p == identifier)
    }

    /// Returns "identifier version", the conventional short form.
    pub fn pretty_string(&self) -> String {
        format!("{} {}", self.identifier, self.version)
    }
}

impl std::fmt::Display for ModuleManifest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_string())
    }
}
