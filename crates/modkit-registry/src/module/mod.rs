// Module model for catalog releases
//
// This module provides the types describing one release of one mod:
// identifier, version, host-compatibility range, relationships to other
// mods, and catalog metadata.

mod manifest;
mod relationship;
mod version;

pub use manifest::{ModuleKind, ModuleManifest, ReleaseStatus};
pub use relationship::RelationshipEntry;
pub use version::Version;
