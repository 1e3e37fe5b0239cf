//! Dependency resolution: the abstract contract and its data types.
//!
//! The installer hands a [`Resolver`] a list of [`Requirement`]s and a
//! [`Universe`] of candidate packages assembled for the operation at hand.
//! The resolver answers with a [`Resolution`] (one exact version per package)
//! or an [`Unsatisfiable`] error. The shipped implementation is
//! [`BacktrackResolver`]; ecosystems with their own solver bind the trait to
//! it instead.

mod backtrack;

pub use backtrack::BacktrackResolver;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use semver::{Comparator, Op, Prerelease, Version, VersionReq};

use crate::error::{RequirementError, Unsatisfiable};
use crate::package::PackageMeta;

/// A named version requirement.
#[derive(Debug, Clone)]
pub struct Requirement {
    pub name: String,
    pub req: VersionReq,
}

impl Requirement {
    /// Parses a requirement string. A bare version (`1.5.0`) pins exactly;
    /// anything with comparators (`>=1.0, <2.0`) is taken as a semver range.
    /// `None` means any version greater than zero.
    pub fn parse(name: &str, input: Option<&str>) -> Result<Self, RequirementError> {
        let Some(raw) = input else {
            return Ok(Self::any(name));
        };
        let trimmed = raw.trim();
        if let Ok(version) = Version::parse(trimmed) {
            return Ok(Self::exact(name, &version));
        }
        let req = VersionReq::parse(trimmed).map_err(|e| RequirementError {
            name: name.to_string(),
            input: raw.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            req,
        })
    }

    /// Any version greater than zero (`>0.0.0`).
    pub fn any(name: &str) -> Self {
        Self {
            name: name.to_string(),
            req: VersionReq {
                comparators: vec![Comparator {
                    op: Op::Greater,
                    major: 0,
                    minor: Some(0),
                    patch: Some(0),
                    pre: Prerelease::EMPTY,
                }],
            },
        }
    }

    /// Exactly the given version (`=x.y.z`).
    pub fn exact(name: &str, version: &Version) -> Self {
        Self {
            name: name.to_string(),
            req: VersionReq {
                comparators: vec![Comparator {
                    op: Op::Exact,
                    major: version.major,
                    minor: Some(version.minor),
                    patch: Some(version.patch),
                    pre: version.pre.clone(),
                }],
            },
        }
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.req.matches(version)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.req)
    }
}

/// Where a universe candidate came from. Determines whether a resolved
/// package needs to be materialized on install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// Already present in the local package directory.
    Installed,
    /// Shipped with the host application.
    Bundled,
    /// A local `.plugin` archive handed to the install operation.
    LocalArchive(PathBuf),
    /// Offered by the package repository.
    Repository,
}

impl CandidateOrigin {
    /// Already-present candidates win ties against ones that would have to be
    /// fetched.
    fn rank(&self) -> u8 {
        match self {
            Self::Installed => 0,
            Self::Bundled => 1,
            Self::LocalArchive(_) => 2,
            Self::Repository => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub meta: PackageMeta,
    pub origin: CandidateOrigin,
}

/// Composite candidate set visible to the resolver for one operation.
#[derive(Debug, Default)]
pub struct Universe {
    candidates: Vec<Candidate>,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, meta: PackageMeta, origin: CandidateOrigin) {
        self.candidates.push(Candidate { meta, origin });
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates for `name`, newest first. Duplicate versions collapse to
    /// the one that is already present locally, if any.
    pub fn candidates_for(&self, name: &str) -> Vec<&Candidate> {
        let mut found: Vec<&Candidate> = self
            .candidates
            .iter()
            .filter(|c| c.meta.name == name)
            .collect();
        found.sort_by(|a, b| {
            b.meta
                .version
                .cmp(&a.meta.version)
                .then_with(|| a.origin.rank().cmp(&b.origin.rank()))
        });
        found.dedup_by(|a, b| a.meta.version == b.meta.version);
        found
    }
}

/// One entry of a resolution: the winning candidate for a package name.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    pub meta: PackageMeta,
    pub origin: CandidateOrigin,
}

/// Mapping from package name to the exact version (and candidate) chosen.
pub type Resolution = BTreeMap<String, ResolvedPackage>;

pub trait Resolver {
    fn resolve(
        &self,
        requirements: &[Requirement],
        universe: &Universe,
    ) -> Result<Resolution, Unsatisfiable>;
}
