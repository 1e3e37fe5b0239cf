//! The persisted manifest of installed plugins.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "plugins_config_version": "1.0.0",
//!   "plugins": [
//!     { "name": "plugin-a", "version": ">=1.0, <2.0" },
//!     { "name": "plugin-b", "installation_type": "path",
//!       "installation_path": "/opt/plugin-b-src" }
//!   ]
//! }
//! ```
//!
//! The document is read on first need (a missing file synthesizes an empty
//! default), mutated in memory, and rewritten whole on every successful
//! operation. There is no cross-step transaction with the package directory;
//! a crash between the two leaves them out of sync.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

pub const MANIFEST_SCHEMA_VERSION: &str = "1.0.0";

/// How a plugin got onto the machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallType {
    #[default]
    Package,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_type: Option<InstallType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_path: Option<PathBuf>,
}

impl PluginEntry {
    /// Entry for a package-type plugin with an optional recorded requirement.
    pub fn package(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
            installation_type: None,
            installation_path: None,
        }
    }

    /// Entry for a path-type plugin sourced from a local directory.
    pub fn path(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            version: None,
            installation_type: Some(InstallType::Path),
            installation_path: Some(path.into()),
        }
    }

    /// Missing `installation_type` means package.
    pub fn install_type(&self) -> InstallType {
        self.installation_type.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "plugins_config_version")]
    pub schema_version: String,
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION.to_string(),
            plugins: Vec::new(),
        }
    }
}

impl Manifest {
    pub fn entry(&self, name: &str) -> Option<&PluginEntry> {
        self.plugins.iter().find(|entry| entry.name == name)
    }
}

/// Lifecycle operation being recorded against the manifest.
#[derive(Debug, Clone)]
pub enum ManifestAction {
    Install(PluginEntry),
    Update(PluginEntry),
    Uninstall,
}

/// File-backed store for the manifest document.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parsed on-disk document, or a fresh default when none exists yet.
    /// Documents from a different schema major version are rejected.
    pub fn read(&self) -> Result<Manifest, ManifestError> {
        if !self.path.exists() {
            return Ok(Manifest::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|e| ManifestError::Invalid {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        let major = manifest.schema_version.split('.').next().unwrap_or("");
        if major != "1" {
            return Err(ManifestError::UnsupportedSchema {
                version: manifest.schema_version,
            });
        }
        Ok(manifest)
    }

    /// Applies one action and rewrites the whole document: any existing entry
    /// for `name` is dropped, and unless the action is an uninstall, the new
    /// entry is appended.
    pub fn record(&self, name: &str, action: ManifestAction) -> Result<(), ManifestError> {
        let mut manifest = self.read()?;
        manifest.plugins.retain(|entry| entry.name != name);
        match action {
            ManifestAction::Install(entry) | ManifestAction::Update(entry) => {
                manifest.plugins.push(entry);
            }
            ManifestAction::Uninstall => {}
        }
        self.write(&manifest)
    }

    fn write(&self, manifest: &Manifest) -> Result<(), ManifestError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut content = serde_json::to_string_pretty(manifest)?;
        content.push('\n');
        // One write call; readers never observe a partially written document.
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
