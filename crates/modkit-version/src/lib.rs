//! Version grammar for the mod registry.
//!
//! This crate knows nothing about modules; it provides the two version
//! domains the registry core orders things by: release versions of mod
//! releases (`ModVersion`, an epoch plus a chunk-compared body) and the
//! host game version (`GameVersion`, dotted numeric components).

mod comparator;
mod error;
mod game_version;
mod mod_version;

pub use comparator::Comparator;
pub use error::VersionError;
pub use game_version::GameVersion;
pub use mod_version::ModVersion;
