//! A simple highest-version-first backtracking solver.
//!
//! Good enough for the plugin universes this crate manages (tens of
//! packages, shallow dependency trees). Not a SAT solver.

use tracing::debug;

use crate::error::Unsatisfiable;
use crate::resolver::{Requirement, Resolution, ResolvedPackage, Resolver, Universe};

#[derive(Debug, Clone, Copy, Default)]
pub struct BacktrackResolver;

impl BacktrackResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for BacktrackResolver {
    fn resolve(
        &self,
        requirements: &[Requirement],
        universe: &Universe,
    ) -> Result<Resolution, Unsatisfiable> {
        let mut chosen = Resolution::new();
        solve(requirements, universe, &mut chosen)?;
        debug!(packages = chosen.len(), "resolution complete");
        Ok(chosen)
    }
}

fn solve(
    pending: &[Requirement],
    universe: &Universe,
    chosen: &mut Resolution,
) -> Result<(), Unsatisfiable> {
    let Some((requirement, rest)) = pending.split_first() else {
        return Ok(());
    };

    if let Some(existing) = chosen.get(&requirement.name) {
        if requirement.matches(&existing.meta.version) {
            return solve(rest, universe, chosen);
        }
        return Err(Unsatisfiable {
            message: format!(
                "'{}' is held at {} which does not satisfy {}",
                requirement.name, existing.meta.version, requirement
            ),
        });
    }

    let candidates = universe.candidates_for(&requirement.name);
    if candidates.is_empty() {
        return Err(Unsatisfiable {
            message: format!("no candidate provides '{}'", requirement.name),
        });
    }

    let mut last_failure: Option<Unsatisfiable> = None;
    for candidate in candidates
        .iter()
        .filter(|c| requirement.matches(&c.meta.version))
    {
        // Each branch works on its own copy so a failed subtree unwinds
        // without bookkeeping.
        let mut attempt = chosen.clone();
        attempt.insert(
            requirement.name.clone(),
            ResolvedPackage {
                meta: candidate.meta.clone(),
                origin: candidate.origin.clone(),
            },
        );

        let mut next: Vec<Requirement> = rest.to_vec();
        match dependency_requirements(candidate.meta.dependencies.iter()) {
            Ok(deps) => next.extend(deps),
            Err(failure) => {
                last_failure = Some(failure);
                continue;
            }
        }

        match solve(&next, universe, &mut attempt) {
            Ok(()) => {
                *chosen = attempt;
                return Ok(());
            }
            Err(failure) => last_failure = Some(failure),
        }
    }

    Err(last_failure.unwrap_or_else(|| Unsatisfiable {
        message: format!("no version satisfies {requirement}"),
    }))
}

fn dependency_requirements<'a>(
    dependencies: impl Iterator<Item = (&'a String, &'a String)>,
) -> Result<Vec<Requirement>, Unsatisfiable> {
    dependencies
        .map(|(name, req)| {
            Requirement::parse(name, Some(req)).map_err(|e| Unsatisfiable {
                message: e.to_string(),
            })
        })
        .collect()
}
