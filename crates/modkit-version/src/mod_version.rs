//! Mod release version type

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};

use crate::comparator::{body_chunks, compare_bodies};
use crate::VersionError;

lazy_static! {
    /// `[epoch:]body` — a decimal epoch, then a body with no whitespace or
    /// further colons.
    static ref MOD_VERSION_RE: Regex = Regex::new(r"^(?:(\d+):)?([^:\s]+)$").unwrap();
}

/// A single mod release version, `[epoch:]body`.
///
/// The original string is kept for display and serialization, but all
/// comparisons use the epoch plus the chunked body algorithm, so `1.0` and
/// `1.00` are the same version even though they print differently.
#[derive(Debug, Clone)]
pub struct ModVersion {
    raw: String,
    epoch: u64,
    body: String,
    /// `(text run, trimmed digit run)` pairs of the body; equal chunk
    /// sequences and comparison equality coincide
    chunks: Vec<(String, String)>,
}

impl ModVersion {
    /// Parse a version string, rejecting empty bodies and malformed epochs.
    pub fn new(version: &str) -> Result<Self, VersionError> {
        let captures = MOD_VERSION_RE
            .captures(version)
            .ok_or_else(|| VersionError::InvalidVersion(version.to_string()))?;

        let epoch = match captures.get(1) {
            Some(m) => m
                .as_str()
                .parse::<u64>()
                .map_err(|_| VersionError::InvalidEpoch(version.to_string()))?,
            None => 0,
        };
        let body = captures
            .get(2)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| VersionError::InvalidVersion(version.to_string()))?;

        Ok(Self {
            raw: version.to_string(),
            epoch,
            chunks: body_chunks(&body),
            body,
        })
    }

    /// The version string exactly as it was given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The epoch component; 0 when none was written.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The version body with any epoch prefix stripped.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl FromStr for ModVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ModVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialEq for ModVersion {
    fn eq(&self, other: &Self) -> bool {
        self.epoch == other.epoch && self.chunks == other.chunks
    }
}

impl Eq for ModVersion {}

impl Hash for ModVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epoch.hash(state);
        self.chunks.hash(state);
    }
}

impl Ord for ModVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_bodies(&self.body, &other.body))
    }
}

impl PartialOrd for ModVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for ModVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ModVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ModVersion::new(&raw).map_err(de::Error::custom)
    }
}
