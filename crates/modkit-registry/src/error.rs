use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    // Query errors
    #[error("module not found: {identifier}")]
    ModuleNotFound { identifier: String },

    // Persistence errors
    #[error("registry version {version} is not supported")]
    UnsupportedRegistryVersion { version: u32 },

    #[error("registry serialization error: {0}")]
    Serialization(String),

    // Sanity errors
    #[error("{}", describe_inconsistency(.unmet, .conflicts))]
    Inconsistent {
        /// Unmet dependency name -> identifiers of the modules that need it.
        unmet: BTreeMap<String, BTreeSet<String>>,
        /// Pairs of mutually conflicting installed identifiers.
        conflicts: Vec<(String, String)>,
    },

    // Installation bookkeeping errors
    #[error("module already installed: {identifier}")]
    AlreadyInstalled { identifier: String },

    // Index invariant errors
    #[error("release of {found} cannot be stored under identifier {expected}")]
    IdentifierMismatch { expected: String, found: String },

    #[error(transparent)]
    Version(#[from] modkit_version::VersionError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

fn describe_inconsistency(
    unmet: &BTreeMap<String, BTreeSet<String>>,
    conflicts: &[(String, String)],
) -> String {
    let mut parts = Vec::new();

    for (dependency, dependents) in unmet {
        let needed_by: Vec<&str> = dependents.iter().map(String::as_str).collect();
        parts.push(format!(
            "{} required by {} but not installed",
            dependency,
            needed_by.join(", ")
        ));
    }

    for (a, b) in conflicts {
        parts.push(format!("{a} conflicts with {b}"));
    }

    format!("inconsistent module set: {}", parts.join("; "))
}
