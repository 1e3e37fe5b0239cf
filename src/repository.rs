//! Package repository access.
//!
//! The [`Repository`] trait is the installer's view of "everything that could
//! be installed": candidate listing for the resolver, name search, and
//! archive fetch. [`LocalRepository`] serves a directory with an `index.json`
//! plus the archives it describes, the shape a mirrored or vendored
//! repository takes on disk. Network transport to a remote repository is a
//! downstream concern; such a client implements this trait and nothing else
//! changes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;
use crate::namespace;
use crate::package::PackageMeta;

pub const REPOSITORY_INDEX_FILE: &str = "index.json";

pub trait Repository {
    /// Every package version the repository offers.
    fn candidates(&self) -> Result<Vec<PackageMeta>, RepositoryError>;

    /// Names matching `query` (exact, or prefix when `exact` is false) with
    /// their available versions in ascending order. Prefix mode hides the
    /// reserved core package.
    fn search(
        &self,
        query: &str,
        exact: bool,
    ) -> Result<BTreeMap<String, Vec<String>>, RepositoryError>;

    /// Local path of the archive for an exact package version.
    fn fetch(&self, name: &str, version: &Version) -> Result<PathBuf, RepositoryError>;
}

/// One row of `index.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    #[serde(flatten)]
    pub meta: PackageMeta,
    /// Archive location relative to the repository root.
    pub archive: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryIndex {
    #[serde(default)]
    pub packages: Vec<IndexEntry>,
}

/// Index-file-backed repository rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index(&self) -> Result<RepositoryIndex, RepositoryError> {
        let path = self.root.join(REPOSITORY_INDEX_FILE);
        if !path.exists() {
            return Err(RepositoryError::IndexNotFound { path });
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| RepositoryError::InvalidIndex {
            path,
            reason: e.to_string(),
        })
    }
}

impl Repository for LocalRepository {
    fn candidates(&self) -> Result<Vec<PackageMeta>, RepositoryError> {
        Ok(self.index()?.packages.into_iter().map(|e| e.meta).collect())
    }

    fn search(
        &self,
        query: &str,
        exact: bool,
    ) -> Result<BTreeMap<String, Vec<String>>, RepositoryError> {
        let index = self.index()?;
        let mut matches: BTreeMap<String, Vec<Version>> = BTreeMap::new();
        for entry in &index.packages {
            let name = &entry.meta.name;
            let matched = if exact {
                name == query
            } else {
                name.starts_with(query) && name != namespace::CORE_PACKAGE
            };
            if matched {
                matches
                    .entry(name.clone())
                    .or_default()
                    .push(entry.meta.version.clone());
            }
        }

        Ok(matches
            .into_iter()
            .map(|(name, mut versions)| {
                versions.sort();
                let versions = versions.into_iter().map(|v| v.to_string()).collect();
                (name, versions)
            })
            .collect())
    }

    fn fetch(&self, name: &str, version: &Version) -> Result<PathBuf, RepositoryError> {
        let index = self.index()?;
        let entry = index
            .packages
            .iter()
            .find(|e| e.meta.name == name && &e.meta.version == version)
            .ok_or_else(|| RepositoryError::NotAvailable {
                name: name.to_string(),
                version: version.clone(),
            })?;
        Ok(self.root.join(&entry.archive))
    }
}
