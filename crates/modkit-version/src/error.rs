use thiserror::Error;

/// Error type for version parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version string \"{0}\"")]
    InvalidVersion(String),
    #[error("invalid epoch in version string \"{0}\"")]
    InvalidEpoch(String),
    #[error("invalid game version \"{0}\"")]
    InvalidGameVersion(String),
}
