//! # plugin-manager
//!
//! Lifecycle manager for a host application's optional plugins: install,
//! update, uninstall, and search, with a persistent manifest kept in sync
//! with what is physically present in the package directory.
//!
//! The [`Installer`] orchestrates; the collaborators it drives are traits
//! with directory-backed implementations shipped in this crate:
//! [`Loader`] (what is on disk), [`Resolver`] (which versions fit together),
//! [`Repository`] (what could be installed), and [`PackageStore`] (the only
//! writer of the package directory).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plugin_manager::{InstallOptions, Installer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut installer = Installer::builder()
//!         .root("/var/lib/hostwork")
//!         .build();
//!
//!     installer.install(
//!         "plugin-hello",
//!         InstallOptions {
//!             version: Some(">=1.0, <2.0".into()),
//!             ..Default::default()
//!         },
//!     )?;
//!
//!     for (name, versions) in installer.search("plugin-", Default::default())? {
//!         println!("{name}: {}", versions.join(", "));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Uninstalling reclaims cruft: every package left in the package directory
//! that no remaining plugin requires, such as older versions of the target
//! and its orphaned transitive dependencies, is deleted.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod installer;
pub mod loader;
pub mod manifest;
pub mod namespace;
pub mod package;
pub mod registry;
pub mod repository;
pub mod resolver;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports for convenience
pub use error::{
    InstallError, LoaderError, ManifestError, PackageError, RepositoryError, RequirementError,
    SearchError, StoreError, UninstallError, Unsatisfiable, UpdateError,
};
pub use installer::{InstallOptions, Installer, InstallerBuilder, SearchOptions, UpdateOptions};
pub use loader::{DirectoryLoader, InstalledPackage, Loader};
pub use manifest::{
    InstallType, MANIFEST_SCHEMA_VERSION, Manifest, ManifestAction, ManifestStore, PluginEntry,
};
pub use package::{PACKAGE_EXTENSION, PACKAGE_META_FILE, PackageMeta};
pub use registry::{PluginStatus, Registry};
pub use repository::{
    IndexEntry, LocalRepository, REPOSITORY_INDEX_FILE, Repository, RepositoryIndex,
};
pub use resolver::{
    BacktrackResolver, Candidate, CandidateOrigin, Requirement, Resolution, ResolvedPackage,
    Resolver, Universe,
};
pub use store::{DirectoryStore, PackageStore};
