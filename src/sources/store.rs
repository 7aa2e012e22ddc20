//! Package store - finds packages by name in candidate directories.

use std::path::{Path, PathBuf};

use crate::core::manifest::{JsonManifestLoader, ManifestLoader};
use crate::core::version::VersionRequirement;
use crate::core::Package;
use crate::resolver::errors::{ResolveError, VersionMismatch};
use crate::sources::loaded::LoadedPackages;

/// Result of a successful lookup.
#[derive(Debug)]
pub enum Located {
    /// Read from disk for the first time in this session.
    Fresh(Package),
    /// Already registered under this canonical root.
    Registered(PathBuf),
}

/// Locates and loads packages from an ordered list of directories.
///
/// A package named `foo` lives in `<candidate>/foo/`. The candidate list is
/// fixed for the lifetime of the store.
pub struct PackageStore<L = JsonManifestLoader> {
    candidates: Vec<PathBuf>,
    loader: L,
    loaded: LoadedPackages,
}

impl PackageStore<JsonManifestLoader> {
    /// Create a store reading `cpackage.json` manifests.
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self::with_loader(candidates, JsonManifestLoader)
    }
}

impl<L: ManifestLoader> PackageStore<L> {
    pub fn with_loader(candidates: Vec<PathBuf>, loader: L) -> Self {
        PackageStore {
            candidates,
            loader,
            loaded: LoadedPackages::new(),
        }
    }

    /// The candidate directories, in search order.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Packages registered so far.
    pub fn loaded(&self) -> &LoadedPackages {
        &self.loaded
    }

    pub fn loaded_mut(&mut self) -> &mut LoadedPackages {
        &mut self.loaded
    }

    /// Check whether a canonical root has been registered.
    pub fn is_loaded(&self, root: &Path) -> bool {
        self.loaded.is_loaded(root)
    }

    /// Register a package. Returns `false` if its root is already known.
    pub fn register(&mut self, package: &Package) -> bool {
        self.loaded.register(package)
    }

    /// Find the first candidate package named `name` satisfying `requirement`.
    ///
    /// Candidates whose manifest cannot be loaded are skipped. A loadable
    /// package with a non-matching version is remembered (the last one wins)
    /// and the search continues. Roots already registered are tested against
    /// their recorded version instead of being read again.
    pub fn load_by_name(
        &self,
        name: &str,
        requirement: &VersionRequirement,
    ) -> Result<Located, ResolveError> {
        let mut mismatch = None;

        for candidate in &self.candidates {
            let dir = candidate.join(name);
            let root = match dir.canonicalize() {
                Ok(root) => root,
                Err(_) => {
                    tracing::trace!("No package directory at {}", dir.display());
                    continue;
                }
            };

            let (version, located) = match self.loaded.get(&root) {
                Some(entry) => (entry.version.clone(), Located::Registered(root.clone())),
                None => match self.loader.load(&root) {
                    Ok(package) => (package.version.clone(), Located::Fresh(package)),
                    Err(e) => {
                        tracing::debug!("Skipping candidate {}: {}", root.display(), e);
                        continue;
                    }
                },
            };

            if requirement.test(&version) {
                return Ok(located);
            }

            tracing::debug!(
                "Package `{}` v{} at {} does not satisfy `{}`",
                name,
                version,
                root.display(),
                requirement
            );
            mismatch = Some(VersionMismatch { root, version });
        }

        Err(ResolveError::PackageNotFound {
            package: name.to_string(),
            requirement: requirement.to_string(),
            searched: self.candidates.clone(),
            mismatch,
        })
    }
}
