//! Operation precondition checks. All of them run before any mutation, so a
//! rejected operation leaves both the manifest and the package directory
//! untouched.

use crate::error::{InstallError, SearchError, UninstallError, UpdateError};
use crate::loader::Loader;
use crate::namespace;
use crate::package::PACKAGE_EXTENSION;
use crate::registry::Registry;

use super::{InstallOptions, UpdateOptions, version_installed};

pub(super) fn install(
    name: &str,
    options: &InstallOptions,
    registry: &Registry,
    loader: &dyn Loader,
) -> Result<(), InstallError> {
    namespace::validate(name).map_err(|reason| InstallError::InvalidName {
        name: name.to_string(),
        reason,
    })?;

    if options.file.is_some() && options.path.is_some() {
        return Err(InstallError::ConflictingSources);
    }
    if options.version.is_some() && (options.file.is_some() || options.path.is_some()) {
        return Err(InstallError::VersionWithLocalSource);
    }

    if let Some(file) = &options.file {
        if file.extension().and_then(|e| e.to_str()) != Some(PACKAGE_EXTENSION) {
            return Err(InstallError::WrongExtension { path: file.clone() });
        }
        if !file.is_file() {
            return Err(InstallError::FileNotFound { path: file.clone() });
        }
    }

    if let Some(path) = &options.path {
        if !path.is_dir() {
            return Err(InstallError::PathNotFound { path: path.clone() });
        }
    }

    if registry.is_known(name) {
        // Asking for the version that is already on disk gets its own error
        // so front ends can word the two cases differently.
        if let Some(version) = &options.version {
            if version_installed(loader, name, version) {
                return Err(InstallError::VersionAlreadyInstalled {
                    name: name.to_string(),
                    version: version.clone(),
                });
            }
        }
        return Err(InstallError::AlreadyInstalled {
            name: name.to_string(),
        });
    }

    Ok(())
}

pub(super) fn update(
    name: &str,
    options: &UpdateOptions,
    registry: &Registry,
    loader: &dyn Loader,
) -> Result<(), UpdateError> {
    namespace::validate(name).map_err(|reason| UpdateError::InvalidName {
        name: name.to_string(),
        reason,
    })?;

    if !registry.is_known(name) {
        return Err(UpdateError::UnknownPlugin {
            name: name.to_string(),
        });
    }
    if registry.is_path_based(name) {
        return Err(UpdateError::PathBased {
            name: name.to_string(),
        });
    }

    if let Some(version) = &options.version {
        if version_installed(loader, name, version) {
            return Err(UpdateError::VersionAlreadyInstalled {
                name: name.to_string(),
                version: version.clone(),
            });
        }
    }

    Ok(())
}

pub(super) fn uninstall(name: &str, registry: &Registry) -> Result<(), UninstallError> {
    namespace::validate(name).map_err(|reason| UninstallError::InvalidName {
        name: name.to_string(),
        reason,
    })?;

    if !registry.is_known(name) {
        return Err(UninstallError::UnknownPlugin {
            name: name.to_string(),
        });
    }

    Ok(())
}

pub(super) fn search(query: &str) -> Result<(), SearchError> {
    if !namespace::is_approved(query) {
        return Err(SearchError::InvalidQuery {
            query: query.to_string(),
            reason: format!(
                "must start with one of: {}",
                namespace::APPROVED_PREFIXES.join(", ")
            ),
        });
    }
    Ok(())
}
