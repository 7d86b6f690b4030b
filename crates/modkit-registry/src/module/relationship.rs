use serde::{Deserialize, Serialize};

use modkit_version::ModVersion;

/// One entry in a manifest's depends / conflicts / recommends / suggests /
/// supports list: a target identifier plus optional version constraints.
///
/// An exact `version` wins over `min_version`/`max_version`; an entry with
/// no constraints matches any version. Constraints only ever bind real
/// versions — a provided identifier or an auto-detected DLL satisfies a
/// relationship by name alone, because neither has a real version to check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEntry {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<ModVersion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_version: Option<ModVersion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_version: Option<ModVersion>,
}

impl RelationshipEntry {
    /// An unconstrained entry naming `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            min_version: None,
            max_version: None,
        }
    }

    /// An entry pinned to exactly `version`.
    pub fn exact(name: impl Into<String>, version: ModVersion) -> Self {
        Self {
            name: name.into(),
            version: Some(version),
            min_version: None,
            max_version: None,
        }
    }

    /// Whether a concrete real version meets this entry's constraints.
    pub fn version_satisfied_by(&self, candidate: &ModVersion) -> bool {
        if let Some(exact) = &self.version {
            return candidate == exact;
        }

        if let Some(min) = &self.min_version {
            if candidate < min {
                return false;
            }
        }
        if let Some(max) = &self.max_version {
            if candidate > max {
                return false;
            }
        }

        true
    }
}

impl std::fmt::Display for RelationshipEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, " = {version}")?;
        }
        if let Some(min) = &self.min_version {
            write!(f, " >= {min}")?;
        }
        if let Some(max) = &self.max_version {
            write!(f, " <= {max}")?;
        }
        Ok(())
    }
}
