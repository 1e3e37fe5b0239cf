//! Fixture tree for installer tests: a temp root with the standard layout
//! (`packages/`, `bundled/`, `repository/`, `plugins.json`).

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::installer::Installer;
use crate::manifest::{Manifest, ManifestAction, ManifestStore, PluginEntry};
use crate::repository::{IndexEntry, REPOSITORY_INDEX_FILE, RepositoryIndex};
use crate::testutil::{install_package, meta, write_archive};

pub(super) struct Fixture {
    root: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("repository").join("archives")).unwrap();
        let fixture = Self { root };
        fixture.write_index(&RepositoryIndex::default());
        fixture
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn installer(&self) -> Installer {
        Installer::builder().root(self.path()).build()
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.path().join("packages")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path().join("plugins.json")
    }

    pub fn manifest(&self) -> Manifest {
        ManifestStore::new(self.manifest_path()).read().unwrap()
    }

    /// Adds a package (archive + index row) to the local repository.
    pub fn add_repo(&self, name: &str, version: &str, deps: &[(&str, &str)]) {
        let meta = meta(name, version, deps);
        let rel = PathBuf::from("archives").join(format!("{}.plugin", meta.dir_name()));
        write_archive(&self.path().join("repository").join(&rel), &meta);

        let index_path = self.path().join("repository").join(REPOSITORY_INDEX_FILE);
        let content = std::fs::read_to_string(&index_path).unwrap();
        let mut index: RepositoryIndex = serde_json::from_str(&content).unwrap();
        index.packages.push(IndexEntry { meta, archive: rel });
        self.write_index(&index);
    }

    /// Materializes a package in the local package directory.
    pub fn add_installed(&self, name: &str, version: &str, deps: &[(&str, &str)]) {
        install_package(&self.packages_dir(), &meta(name, version, deps));
    }

    /// Materializes a package in the host's bundled directory.
    pub fn add_bundled(&self, name: &str, version: &str, deps: &[(&str, &str)]) {
        install_package(&self.path().join("bundled"), &meta(name, version, deps));
    }

    /// Records a package-type manifest entry directly, bypassing install.
    pub fn record_entry(&self, name: &str, version: Option<&str>) {
        ManifestStore::new(self.manifest_path())
            .record(
                name,
                ManifestAction::Install(PluginEntry::package(
                    name,
                    version.map(str::to_string),
                )),
            )
            .unwrap();
    }

    /// Writes a standalone `.plugin` archive outside the repository.
    pub fn local_archive(&self, name: &str, version: &str, deps: &[(&str, &str)]) -> PathBuf {
        let meta = meta(name, version, deps);
        let path = self.path().join(format!("{}.plugin", meta.dir_name()));
        write_archive(&path, &meta);
        path
    }

    pub fn has_package(&self, name: &str, version: &str) -> bool {
        self.packages_dir().join(format!("{name}-{version}")).is_dir()
    }

    fn write_index(&self, index: &RepositoryIndex) {
        std::fs::write(
            self.path().join("repository").join(REPOSITORY_INDEX_FILE),
            serde_json::to_string_pretty(index).unwrap(),
        )
        .unwrap();
    }
}
