//! Host game version type

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};

use crate::VersionError;

lazy_static! {
    static ref GAME_VERSION_RE: Regex = Regex::new(r"^\d+(?:\.\d+){0,3}$").unwrap();
}

/// The version of the host game being modded: one to four dotted numeric
/// components. Totally ordered componentwise, with a shorter prefix sorting
/// before any extension of it (`1.0 < 1.0.5 < 1.1`).
///
/// Manifests may declare partial versions; `targets` and the min/max bound
/// checks give those prefix semantics, so a declared `1.0` covers every
/// `1.0.x` host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameVersion {
    components: Vec<u32>,
}

impl GameVersion {
    pub fn new(version: &str) -> Result<Self, VersionError> {
        if !GAME_VERSION_RE.is_match(version) {
            return Err(VersionError::InvalidGameVersion(version.to_string()));
        }

        let components = version
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| VersionError::InvalidGameVersion(version.to_string()))
            })
            .collect::<Result<Vec<u32>, VersionError>>()?;

        Ok(Self { components })
    }

    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// True when self's components are a prefix of (or equal to) `host`'s.
    /// This is the exact-compatibility rule: a module built for `1.0`
    /// targets hosts `1.0`, `1.0.5`, and so on.
    pub fn targets(&self, host: &GameVersion) -> bool {
        host.components.len() >= self.components.len()
            && host.components[..self.components.len()] == self.components[..]
    }

    /// True when `host` meets self as a lower bound.
    pub fn is_lower_bound_for(&self, host: &GameVersion) -> bool {
        host.components >= self.components
    }

    /// True when `host` meets self as an upper bound. The host is truncated
    /// to the bound's precision first, so max `1.0` admits `1.0.5` but not
    /// `1.1.2`.
    pub fn is_upper_bound_for(&self, host: &GameVersion) -> bool {
        let len = self.components.len().min(host.components.len());
        host.components[..len] <= self.components[..]
    }
}

impl FromStr for GameVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl Serialize for GameVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GameVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        GameVersion::new(&raw).map_err(de::Error::custom)
    }
}
