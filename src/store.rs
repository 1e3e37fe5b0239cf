//! Package directory mutation.
//!
//! The [`PackageStore`] is the only component that writes to the package
//! directory: it materializes archives on install and deletes package trees
//! on reclamation. Callers are expected to have resolved first; removal is
//! forcible and does not re-check dependents.

use std::fs::File;
use std::path::{Path, PathBuf};

use semver::Version;
use tracing::debug;

use crate::error::StoreError;
use crate::package::PackageMeta;

pub trait PackageStore {
    /// Extracts a package archive into the package directory and returns the
    /// descriptor of what was installed. Reinstalling an existing version
    /// replaces it.
    fn install_archive(&self, archive: &Path) -> Result<PackageMeta, StoreError>;

    /// Forcibly removes an exact package version from the package directory.
    fn remove(&self, name: &str, version: &Version) -> Result<(), StoreError>;
}

/// Store over a flat `<package_dir>/<name>-<version>/` layout.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    package_dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(package_dir: impl Into<PathBuf>) -> Self {
        Self {
            package_dir: package_dir.into(),
        }
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }
}

impl PackageStore for DirectoryStore {
    fn install_archive(&self, archive: &Path) -> Result<PackageMeta, StoreError> {
        let meta = PackageMeta::from_archive(archive)?;
        let dest = self.package_dir.join(meta.dir_name());
        if dest.exists() {
            std::fs::remove_dir_all(&dest)?;
        }
        std::fs::create_dir_all(&dest)?;

        let file = File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file).map_err(|e| StoreError::Extract {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })?;
        zip.extract(&dest).map_err(|e| StoreError::Extract {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(package = %meta.dir_name(), "extracted package archive");
        Ok(meta)
    }

    fn remove(&self, name: &str, version: &Version) -> Result<(), StoreError> {
        let dir = self.package_dir.join(format!("{name}-{version}"));
        if !dir.exists() {
            return Err(StoreError::NotInstalled {
                name: name.to_string(),
                version: version.clone(),
            });
        }
        std::fs::remove_dir_all(&dir)?;
        debug!(package = %format!("{name}-{version}"), "removed package");
        Ok(())
    }
}
