//! Lifecycle orchestration: validation, resolution, mutation, persistence.
//!
//! The [`Installer`] is an explicit context object owning its collaborators
//! (loader, resolver, repository, package store) plus the manifest store
//! anchored at the loader's manifest path. Construct one per process (or per
//! test) with [`Installer::builder`]; there is no hidden global state.
//!
//! Every public operation is synchronous and runs to completion:
//! validate → acquire source → resolve → mutate → persist. Validation
//! failures never mutate anything. Package-directory mutation and the
//! manifest rewrite are two separate steps with no transaction between them;
//! a crash in the gap leaves them out of sync and callers re-run or repair.

mod validate;


use std::collections::BTreeMap;
use std::path::PathBuf;

use semver::Version;
use tracing::{debug, info};

use crate::error::{
    InstallError, LoaderError, RepositoryError, SearchError, StoreError, UninstallError,
    UpdateError,
};
use crate::loader::{DirectoryLoader, Loader};
use crate::manifest::{ManifestAction, ManifestStore, PluginEntry};
use crate::package::PackageMeta;
use crate::registry::Registry;
use crate::repository::{LocalRepository, Repository};
use crate::resolver::{
    BacktrackResolver, CandidateOrigin, Requirement, Resolution, Resolver, Universe,
};
use crate::store::{DirectoryStore, PackageStore};

/// Options accepted by [`Installer::install`].
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Local `.plugin` archive to install instead of a repository lookup.
    pub file: Option<PathBuf>,
    /// Local source directory to record without any package mutation.
    pub path: Option<PathBuf>,
    /// Version requirement; repository installs only.
    pub version: Option<String>,
}

/// Options accepted by [`Installer::update`]. Updates always come from the
/// repository, so there are no file/path fields to misuse.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Version requirement; a bare version pins exactly.
    pub version: Option<String>,
}

/// Options accepted by [`Installer::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Match the query as a full name instead of a prefix.
    pub exact: bool,
}

pub struct Installer {
    loader: Box<dyn Loader>,
    resolver: Box<dyn Resolver>,
    repository: Box<dyn Repository>,
    store: Box<dyn PackageStore>,
    manifest: ManifestStore,
}

impl Installer {
    /// The manifest location comes from the loader, which owns the question
    /// of where things live on disk.
    pub fn new(
        loader: Box<dyn Loader>,
        resolver: Box<dyn Resolver>,
        repository: Box<dyn Repository>,
        store: Box<dyn PackageStore>,
    ) -> Self {
        let manifest = ManifestStore::new(loader.manifest_path());
        Self {
            loader,
            resolver,
            repository,
            store,
            manifest,
        }
    }

    pub fn builder() -> InstallerBuilder {
        InstallerBuilder::default()
    }

    /// Installs a plugin from the repository, a local archive (`file`), or a
    /// local source directory (`path`).
    pub fn install(&mut self, name: &str, options: InstallOptions) -> Result<(), InstallError> {
        let registry = self.registry()?;
        validate::install(name, &options, &registry, self.loader.as_ref())?;

        // Path installs record intent only; nothing is materialized.
        if let Some(path) = options.path {
            self.manifest
                .record(name, ManifestAction::Install(PluginEntry::path(name, &path)))?;
            info!(plugin = name, path = %path.display(), "registered path-based plugin");
            return Ok(());
        }

        let recorded_version;
        let resolution = if let Some(file) = &options.file {
            let meta = PackageMeta::from_archive(file)?;
            if meta.name != name {
                return Err(InstallError::FilePluginMismatch {
                    name: name.to_string(),
                    found: meta.name,
                });
            }
            recorded_version = Some(meta.version.to_string());
            let requirement = Requirement::exact(name, &meta.version);
            let mut universe = self.general_universe::<InstallError>(None)?;
            universe.add(meta, CandidateOrigin::LocalArchive(file.clone()));
            self.resolve_install(name, &[requirement], &universe)?
        } else {
            recorded_version = options.version.clone();
            let requirement = Requirement::parse(name, options.version.as_deref())?;
            let universe = self.general_universe::<InstallError>(None)?;
            self.resolve_install(name, &[requirement], &universe)?
        };

        self.apply_plan::<InstallError>(&resolution)?;
        self.manifest.record(
            name,
            ManifestAction::Install(PluginEntry::package(name, recorded_version)),
        )?;
        info!(plugin = name, "installed plugin");
        Ok(())
    }

    /// Updates a repository-installed plugin. The currently installed version
    /// of the target is left out of the universe's installed set so the
    /// resolver actually reconsiders repository candidates.
    pub fn update(&mut self, name: &str, options: UpdateOptions) -> Result<(), UpdateError> {
        let registry = self.registry()?;
        validate::update(name, &options, &registry, self.loader.as_ref())?;

        let requirement = Requirement::parse(name, options.version.as_deref())?;
        let universe = self.general_universe::<UpdateError>(Some(name))?;
        let resolution = self
            .resolver
            .resolve(&[requirement], &universe)
            .map_err(|e| UpdateError::Resolution {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        self.apply_plan::<UpdateError>(&resolution)?;
        self.manifest.record(
            name,
            ManifestAction::Update(PluginEntry::package(name, options.version.clone())),
        )?;
        info!(plugin = name, "updated plugin");
        Ok(())
    }

    /// Uninstalls a plugin. For package-type plugins this reclaims every
    /// package no longer required by any remaining plugin: the still-required
    /// set is resolved against a local-only universe, and anything physically
    /// present that did not make it into the result is cruft.
    pub fn uninstall(&mut self, name: &str) -> Result<(), UninstallError> {
        let registry = self.registry()?;
        validate::uninstall(name, &registry)?;

        if registry.is_path_based(name) {
            self.manifest.record(name, ManifestAction::Uninstall)?;
            info!(plugin = name, "removed path-based plugin entry");
            return Ok(());
        }

        let still_required = registry.still_required(name)?;
        let universe = self.local_universe::<UninstallError>()?;
        let necessary = self
            .resolver
            .resolve(&still_required, &universe)
            .map_err(|e| UninstallError::Resolution {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        let mut reclaimed = 0usize;
        for package in self.loader.installed_packages()? {
            let needed = necessary
                .get(&package.meta.name)
                .is_some_and(|resolved| resolved.meta.version == package.meta.version);
            if needed {
                continue;
            }
            self.store.remove(&package.meta.name, &package.meta.version)?;
            debug!(package = %package.meta.dir_name(), "reclaimed package");
            reclaimed += 1;
        }

        self.manifest.record(name, ManifestAction::Uninstall)?;
        info!(plugin = name, reclaimed, "uninstalled plugin");
        Ok(())
    }

    /// Looks up repository packages by name prefix (default) or exact name.
    pub fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<BTreeMap<String, Vec<String>>, SearchError> {
        validate::search(query)?;
        Ok(self.repository.search(query, options.exact)?)
    }

    /// Whether the registry knows `name`, in any installation type.
    pub fn is_installed(&self, name: &str) -> bool {
        self.manifest
            .read()
            .map(|manifest| Registry::from_manifest(&manifest).is_known(name))
            .unwrap_or(false)
    }

    /// Whether this exact version is physically present in the package
    /// directory.
    pub fn is_version_installed(&self, name: &str, version: &str) -> bool {
        version_installed(self.loader.as_ref(), name, version)
    }

    /// Install root of the newest physically present version of `name`.
    pub fn install_root(&self, name: &str) -> Option<PathBuf> {
        self.loader.install_root(name).ok().flatten()
    }

    fn registry(&self) -> Result<Registry, crate::error::ManifestError> {
        Ok(Registry::from_manifest(&self.manifest.read()?))
    }

    /// Installed + bundled + repository candidates. In update mode the
    /// target's installed versions are withheld so they cannot satisfy the
    /// requirement as already-present.
    fn general_universe<E>(&self, exclude_installed: Option<&str>) -> Result<Universe, E>
    where
        E: From<LoaderError> + From<RepositoryError>,
    {
        let mut universe = self.local_universe_excluding::<E>(exclude_installed)?;
        for meta in self.repository.candidates()? {
            universe.add(meta, CandidateOrigin::Repository);
        }
        debug!(candidates = universe.len(), "assembled dependency universe");
        Ok(universe)
    }

    /// Installed + bundled candidates only; the uninstall universe.
    fn local_universe<E>(&self) -> Result<Universe, E>
    where
        E: From<LoaderError>,
    {
        self.local_universe_excluding(None)
    }

    fn local_universe_excluding<E>(&self, exclude_installed: Option<&str>) -> Result<Universe, E>
    where
        E: From<LoaderError>,
    {
        let mut universe = Universe::new();
        for package in self.loader.installed_packages()? {
            if exclude_installed.is_some_and(|target| target == package.meta.name) {
                continue;
            }
            universe.add(package.meta, CandidateOrigin::Installed);
        }
        for package in self.loader.bundled_packages()? {
            universe.add(package.meta, CandidateOrigin::Bundled);
        }
        Ok(universe)
    }

    fn resolve_install(
        &self,
        name: &str,
        requirements: &[Requirement],
        universe: &Universe,
    ) -> Result<Resolution, InstallError> {
        self.resolver
            .resolve(requirements, universe)
            .map_err(|e| InstallError::Resolution {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Materializes a resolution: packages already installed or bundled are
    /// left alone, everything else is fetched (or taken from the local
    /// archive) and handed to the package store.
    fn apply_plan<E>(&self, resolution: &Resolution) -> Result<(), E>
    where
        E: From<RepositoryError> + From<StoreError>,
    {
        for resolved in resolution.values() {
            let archive = match &resolved.origin {
                CandidateOrigin::Installed | CandidateOrigin::Bundled => continue,
                CandidateOrigin::LocalArchive(path) => path.clone(),
                CandidateOrigin::Repository => self
                    .repository
                    .fetch(&resolved.meta.name, &resolved.meta.version)?,
            };
            self.store.install_archive(&archive)?;
            debug!(package = %resolved.meta.dir_name(), "installed package");
        }
        Ok(())
    }
}

fn version_installed(loader: &dyn Loader, name: &str, version: &str) -> bool {
    let Ok(wanted) = Version::parse(version) else {
        return false;
    };
    loader
        .installed_packages()
        .map(|packages| {
            packages
                .iter()
                .any(|p| p.meta.name == name && p.meta.version == wanted)
        })
        .unwrap_or(false)
}

/// Builds an [`Installer`], defaulting any collaborator that was not supplied
/// to the standard directory-backed implementation anchored at `root`.
#[derive(Default)]
pub struct InstallerBuilder {
    root: Option<PathBuf>,
    loader: Option<Box<dyn Loader>>,
    resolver: Option<Box<dyn Resolver>>,
    repository: Option<Box<dyn Repository>>,
    store: Option<Box<dyn PackageStore>>,
}

impl InstallerBuilder {
    /// Anchor for defaulted collaborators: `<root>/packages`,
    /// `<root>/bundled`, `<root>/repository`, `<root>/plugins.json`. Falls
    /// back to `~/.plugin-manager` when unset.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    pub fn repository(mut self, repository: impl Repository + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    pub fn store(mut self, store: impl PackageStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn build(self) -> Installer {
        let root = self
            .root
            .or_else(DirectoryLoader::default_root)
            .unwrap_or_else(|| PathBuf::from("."));
        let loader = self
            .loader
            .unwrap_or_else(|| Box::new(DirectoryLoader::from_root(&root)));
        let resolver = self
            .resolver
            .unwrap_or_else(|| Box::new(BacktrackResolver::new()));
        let repository = self
            .repository
            .unwrap_or_else(|| Box::new(LocalRepository::new(root.join("repository"))));
        let store = self
            .store
            .unwrap_or_else(|| Box::new(DirectoryStore::new(root.join("packages"))));
        Installer::new(loader, resolver, repository, store)
    }
}
