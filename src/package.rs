//! Package metadata and the on-disk archive format.
//!
//! Every package, wherever it lives (an installed directory, the bundled
//! directory, a `.plugin` archive, a repository index row), is described by a
//! `plugin.json` descriptor. A package travels as a ZIP archive with the
//! descriptor at its root plus payload files, and installs into
//! `<package_dir>/<name>-<version>/`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::PackageError;

/// Approved extension for package archive files.
pub const PACKAGE_EXTENSION: &str = "plugin";

/// Descriptor file at the root of every package.
pub const PACKAGE_META_FILE: &str = "plugin.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMeta {
    pub name: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Package name → version requirement string.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
}

impl PackageMeta {
    /// Reads the descriptor from an installed package directory.
    pub fn from_dir(dir: &Path) -> Result<Self, PackageError> {
        let path = dir.join(PACKAGE_META_FILE);
        if !path.exists() {
            return Err(PackageError::MetadataNotFound { path });
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| PackageError::InvalidMetadata {
            path,
            reason: e.to_string(),
        })
    }

    /// Reads the descriptor from the root of a `.plugin` archive without
    /// extracting the payload.
    pub fn from_archive(path: &Path) -> Result<Self, PackageError> {
        let file = File::open(path)?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| PackageError::Archive {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let mut entry = archive
            .by_name(PACKAGE_META_FILE)
            .map_err(|e| PackageError::Archive {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        serde_json::from_str(&content).map_err(|e| PackageError::InvalidMetadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Directory name this package occupies inside the package directory.
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}
