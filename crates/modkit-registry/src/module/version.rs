use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use modkit_version::ModVersion;

/// The version under which an identifier is known to the registry.
///
/// Only real release versions are ordered; an auto-detected DLL has no
/// known version and a provided identifier only exists by virtue of its
/// provider, so any cross-variant comparison is undefined and yields
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Version {
    /// A real release version
    Real(ModVersion),
    /// Present on disk, real version unknown
    Dll,
    /// Virtual; carries the identifier of the providing module
    Provides(String),
}

impl Version {
    /// The real release version, when there is one.
    pub fn as_real(&self) -> Option<&ModVersion> {
        match self {
            Version::Real(version) => Some(version),
            _ => None,
        }
    }

    pub fn is_dll(&self) -> bool {
        matches!(self, Version::Dll)
    }

    pub fn is_provided(&self) -> bool {
        matches!(self, Version::Provides(_))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Version::Real(a), Version::Real(b)) => Some(a.cmp(b)),
            // equal values compare equal; anything else is undefined
            (Version::Dll, Version::Dll) => Some(Ordering::Equal),
            (Version::Provides(a), Version::Provides(b)) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Real(version) => write!(f, "{version}"),
            Version::Dll => write!(f, "autodetected dll"),
            Version::Provides(provider) => write!(f, "provided by {provider}"),
        }
    }
}
