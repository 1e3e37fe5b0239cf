//! In-memory view of known plugin statuses.
//!
//! Derived from the manifest at the start of each operation; the validation
//! layer and the uninstall algorithm query it instead of re-reading the
//! document.

use std::path::PathBuf;

use crate::error::RequirementError;
use crate::manifest::{InstallType, Manifest};
use crate::resolver::Requirement;

#[derive(Debug, Clone)]
pub struct PluginStatus {
    pub name: String,
    pub install_type: InstallType,
    /// Recorded version requirement string, verbatim from the manifest.
    pub version_req: Option<String>,
    /// Source directory, present only for path-type plugins.
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    statuses: Vec<PluginStatus>,
}

impl Registry {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let statuses = manifest
            .plugins
            .iter()
            .map(|entry| PluginStatus {
                name: entry.name.clone(),
                install_type: entry.install_type(),
                version_req: entry.version.clone(),
                source_path: entry.installation_path.clone(),
            })
            .collect();
        Self { statuses }
    }

    pub fn statuses(&self) -> &[PluginStatus] {
        &self.statuses
    }

    pub fn get(&self, name: &str) -> Option<&PluginStatus> {
        self.statuses.iter().find(|status| status.name == name)
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_path_based(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|status| status.install_type == InstallType::Path)
    }

    /// Requirements for every package-type plugin except `excluded`, each
    /// carrying its recorded constraint or "any version" when unspecified.
    /// This is the still-required set the uninstall algorithm resolves.
    pub fn still_required(&self, excluded: &str) -> Result<Vec<Requirement>, RequirementError> {
        self.statuses
            .iter()
            .filter(|status| {
                status.name != excluded && status.install_type == InstallType::Package
            })
            .map(|status| Requirement::parse(&status.name, status.version_req.as_deref()))
            .collect()
    }
}
