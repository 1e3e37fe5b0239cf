//! Error taxonomies for the lifecycle operations.
//!
//! Each public operation carries its own enum (`InstallError`, `UpdateError`,
//! `UninstallError`, `SearchError`); infrastructure failures from the
//! collaborators convert into them via `#[from]`.

use std::path::PathBuf;

use semver::Version;

use crate::package::PACKAGE_EXTENSION;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("Invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Options 'file' and 'path' are mutually exclusive")]
    ConflictingSources,

    #[error("A version constraint only applies to repository installs")]
    VersionWithLocalSource,

    #[error("Package file {path} does not exist")]
    FileNotFound { path: PathBuf },

    #[error("Package file {path} must have the '.{ext}' extension", ext = PACKAGE_EXTENSION)]
    WrongExtension { path: PathBuf },

    #[error("Source path {path} is not a directory")]
    PathNotFound { path: PathBuf },

    #[error("Package file provides '{found}', not the requested plugin '{name}'")]
    FilePluginMismatch { name: String, found: String },

    #[error("Plugin '{name}' version {version} is already installed")]
    VersionAlreadyInstalled { name: String, version: String },

    #[error("Plugin '{name}' is already installed")]
    AlreadyInstalled { name: String },

    #[error("Cannot install plugin '{name}': {message}")]
    Resolution { name: String, message: String },

    #[error(transparent)]
    Requirement(#[from] RequirementError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("Invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Plugin '{name}' is not installed")]
    UnknownPlugin { name: String },

    #[error("Plugin '{name}' is installed from a local path and cannot be updated")]
    PathBased { name: String },

    #[error("Plugin '{name}' version {version} is already installed")]
    VersionAlreadyInstalled { name: String, version: String },

    #[error("Cannot update plugin '{name}': {message}")]
    Resolution { name: String, message: String },

    #[error(transparent)]
    Requirement(#[from] RequirementError),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

#[derive(Debug, thiserror::Error)]
pub enum UninstallError {
    #[error("Invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Plugin '{name}' is not installed")]
    UnknownPlugin { name: String },

    #[error("Cannot uninstall plugin '{name}': {message}")]
    Resolution { name: String, message: String },

    #[error(transparent)]
    Requirement(#[from] RequirementError),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid search query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A version requirement string that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("Invalid version requirement '{input}' for '{name}': {reason}")]
pub struct RequirementError {
    pub name: String,
    pub input: String,
    pub reason: String,
}

/// Raised by a [`Resolver`](crate::resolver::Resolver) when no consistent
/// version assignment exists for the given requirements.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Unsatisfiable {
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("Package metadata not found: {path}")]
    MetadataNotFound { path: PathBuf },

    #[error("Invalid package metadata at {path}: {reason}")]
    InvalidMetadata { path: PathBuf, reason: String },

    #[error("Unreadable package archive {path}: {reason}")]
    Archive { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Package {name}-{version} is not present in the package directory")]
    NotInstalled { name: String, version: Version },

    #[error("Failed to extract package archive {path}: {reason}")]
    Extract { path: PathBuf, reason: String },

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Package index not found: {path}")]
    IndexNotFound { path: PathBuf },

    #[error("Invalid package index at {path}: {reason}")]
    InvalidIndex { path: PathBuf, reason: String },

    #[error("Package {name}-{version} is not available from the repository")]
    NotAvailable { name: String, version: Version },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Unsupported manifest schema version '{version}'")]
    UnsupportedSchema { version: String },

    #[error("Invalid manifest at {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
