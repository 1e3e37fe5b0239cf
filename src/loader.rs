//! Physical enumeration of packages on disk.
//!
//! The [`Loader`] is the installer's window onto what is actually present:
//! the local package directory, the packages bundled with the host
//! application, and the location of the plugin manifest. [`DirectoryLoader`]
//! is the standard implementation; hosts with exotic layouts implement the
//! trait themselves.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::LoaderError;
use crate::package::{PACKAGE_META_FILE, PackageMeta};

/// A package physically present on disk.
#[derive(Debug, Clone)]
pub struct InstalledPackage {
    pub meta: PackageMeta,
    pub dir: PathBuf,
}

pub trait Loader {
    /// Packages present in the local package directory.
    fn installed_packages(&self) -> Result<Vec<InstalledPackage>, LoaderError>;

    /// Packages shipped with the host application.
    fn bundled_packages(&self) -> Result<Vec<InstalledPackage>, LoaderError>;

    /// Install root of the newest physically present version of `name`.
    fn install_root(&self, name: &str) -> Result<Option<PathBuf>, LoaderError>;

    /// Location of the plugin manifest file.
    fn manifest_path(&self) -> PathBuf;
}

/// Loader over the standard `<root>/packages`, `<root>/bundled`,
/// `<root>/plugins.json` layout.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    package_dir: PathBuf,
    bundled_dir: Option<PathBuf>,
    manifest_path: PathBuf,
}

impl DirectoryLoader {
    pub fn new(
        package_dir: impl Into<PathBuf>,
        bundled_dir: Option<PathBuf>,
        manifest_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            package_dir: package_dir.into(),
            bundled_dir,
            manifest_path: manifest_path.into(),
        }
    }

    /// Default root: `~/.plugin-manager/`.
    pub fn default_root() -> Option<PathBuf> {
        directories::UserDirs::new().map(|d| d.home_dir().join(".plugin-manager"))
    }

    /// Standard layout anchored at `root`.
    pub fn from_root(root: &Path) -> Self {
        Self::new(
            root.join("packages"),
            Some(root.join("bundled")),
            root.join("plugins.json"),
        )
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    fn scan(dir: &Path) -> Result<Vec<InstalledPackage>, LoaderError> {
        let mut found = Vec::new();
        if !dir.exists() {
            return Ok(found);
        }
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() || !path.join(PACKAGE_META_FILE).exists() {
                continue;
            }
            match PackageMeta::from_dir(&path) {
                Ok(meta) => found.push(InstalledPackage { meta, dir: path }),
                Err(err) => {
                    warn!(dir = %path.display(), %err, "skipping unreadable package directory");
                }
            }
        }
        found.sort_by(|a, b| {
            a.meta
                .name
                .cmp(&b.meta.name)
                .then_with(|| a.meta.version.cmp(&b.meta.version))
        });
        Ok(found)
    }
}

impl Loader for DirectoryLoader {
    fn installed_packages(&self) -> Result<Vec<InstalledPackage>, LoaderError> {
        Self::scan(&self.package_dir)
    }

    fn bundled_packages(&self) -> Result<Vec<InstalledPackage>, LoaderError> {
        match &self.bundled_dir {
            Some(dir) => Self::scan(dir),
            None => Ok(Vec::new()),
        }
    }

    fn install_root(&self, name: &str) -> Result<Option<PathBuf>, LoaderError> {
        let newest = self
            .installed_packages()?
            .into_iter()
            .filter(|p| p.meta.name == name)
            .max_by(|a, b| a.meta.version.cmp(&b.meta.version));
        Ok(newest.map(|p| p.dir))
    }

    fn manifest_path(&self) -> PathBuf {
        self.manifest_path.clone()
    }
}
