//! Package resolution operations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::Package;
use crate::resolver::{ResolveStats, Resolver};
use crate::sources::{LoadState, PackageStore};
use crate::util::config::load_config;
use crate::util::diagnostic::suggestions;
use crate::util::{Diagnostic, GlobalContext};

/// A dependency package loaded during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedSummary {
    pub name: String,
    pub version: String,
    pub root: PathBuf,
}

/// The result of resolving a root package.
#[derive(Debug, Serialize)]
pub struct ResolvedPackage {
    pub package: Package,
    /// Dependency packages, in canonical root order
    pub dependencies: Vec<LoadedSummary>,
    /// Directories searched for dependency packages, in order
    #[serde(skip)]
    pub candidates: Vec<PathBuf>,
    #[serde(skip)]
    pub stats: ResolveStats,
}

impl ResolvedPackage {
    /// Serialize the resolved package and its dependencies as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize resolved package")
    }
}

/// Resolve the package found at or above the context's working directory.
pub fn resolve_package(ctx: &GlobalContext) -> Result<ResolvedPackage> {
    let root = ctx.find_package_root()?;
    let config = load_config(&ctx.config_path(), &ctx.project_config_path());
    resolve_at(&root, ctx.candidate_dirs(&config))
}

/// Load the package in `root` and resolve it against `candidates`.
pub fn resolve_at(root: &Path, candidates: Vec<PathBuf>) -> Result<ResolvedPackage> {
    let mut package = Package::load(root)
        .with_context(|| format!("failed to load package at {}", root.display()))?;

    tracing::debug!(
        "Resolving `{}` with candidates {:?}",
        package,
        candidates
    );

    let mut resolver = Resolver::new(PackageStore::new(candidates.clone()));
    resolver
        .resolve(&mut package)
        .with_context(|| format!("failed to resolve dependencies of `{}`", package.name))?;

    let dependencies = resolver
        .store()
        .loaded()
        .iter()
        .filter(|(_, entry)| matches!(entry.state, LoadState::Shared(_)))
        .map(|(root, entry)| LoadedSummary {
            name: entry.name.clone(),
            version: entry.version.to_string(),
            root: root.clone(),
        })
        .collect();

    let stats = resolver.stats();
    tracing::info!(
        "Resolved `{}`: {} package(s) loaded, {} reused, {} merge(s)",
        package.name,
        stats.packages_loaded,
        stats.packages_reused,
        stats.merges
    );

    Ok(ResolvedPackage {
        package,
        dependencies,
        candidates,
        stats,
    })
}

/// Problems in a package that do not stop resolution.
pub fn package_warnings(package: &Package) -> Vec<Diagnostic> {
    let mut warnings = Vec::new();

    if let Some(startup) = &package.startup_project {
        if package.find_project(startup).is_none() {
            let mut diag = Diagnostic::warning(format!(
                "startup project `{}` is not a project of `{}`",
                startup, package.name
            ))
            .with_location(package.manifest_path());
            let names = package.project_names();
            if !names.is_empty() {
                diag = diag.with_context(format!("available projects: {}", names.join(", ")));
            }
            warnings.push(diag.with_suggestion(suggestions::STARTUP_PROJECT));
        }
    }

    warnings
}
