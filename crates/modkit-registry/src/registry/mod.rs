mod available;
mod dll;
mod installed;
#[allow(clippy::module_inception)]
mod registry;

pub use available::AvailableModule;
pub use dll::{classify_dll_path, DllLocation};
pub use installed::{InstalledFile, InstalledModule};
pub use registry::{Registry, CURRENT_REGISTRY_VERSION};

#[cfg(test)]
mod tests;
