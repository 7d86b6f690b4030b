pub mod dependency_graph;
pub mod error;
pub mod module;
pub mod registry;
pub mod sanity;

pub use dependency_graph::find_reverse_dependencies;
pub use error::{RegistryError, Result};
pub use module::{ModuleKind, ModuleManifest, RelationshipEntry, ReleaseStatus, Version};
pub use registry::{
    classify_dll_path, AvailableModule, DllLocation, InstalledFile, InstalledModule, Registry,
    CURRENT_REGISTRY_VERSION,
};
pub use sanity::{check_consistency, conflicts, unmet_dependencies};
