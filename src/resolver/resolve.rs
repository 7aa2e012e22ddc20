//! Recursive dependency resolution.
//!
//! Walks the declared dependencies of every project, loads dependency
//! packages through the [`PackageStore`], resolves them first, and merges
//! their visible configuration into the declaring project's computed state.

use std::rc::Rc;

use crate::core::configuration::Access;
use crate::core::dependency::{Dependency, PackageDependency};
use crate::core::manifest::{JsonManifestLoader, ManifestLoader};
use crate::core::Package;
use crate::resolver::errors::ResolveError;
use crate::resolver::merge::{inherit_configuration_from, MergeSource};
use crate::sources::store::{Located, PackageStore};

/// Counters describing one resolution session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Dependency packages read and resolved
    pub packages_loaded: usize,
    /// Dependencies satisfied by an already resolved package
    pub packages_reused: usize,
    /// Project configurations merged into consumers
    pub merges: usize,
}

/// Resolves packages in place.
///
/// One resolver is one session: every package it loads is registered once
/// and shared by all of its consumers. The root passed to
/// [`Resolver::resolve`] stays registered as in progress, so a dependency
/// leading back to it is reported as a cycle.
pub struct Resolver<L = JsonManifestLoader> {
    store: PackageStore<L>,
    /// Names of the packages on the active resolution path
    active: Vec<String>,
    stats: ResolveStats,
}

impl<L: ManifestLoader> Resolver<L> {
    pub fn new(store: PackageStore<L>) -> Self {
        Resolver {
            store,
            active: Vec::new(),
            stats: ResolveStats::default(),
        }
    }

    pub fn store(&self) -> &PackageStore<L> {
        &self.store
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }

    /// Resolve `package` and, recursively, everything it depends on.
    ///
    /// On error the computed state of `package` is incomplete and must not
    /// be used.
    pub fn resolve(&mut self, package: &mut Package) -> Result<(), ResolveError> {
        self.store.register(package);
        self.resolve_projects(package)
    }

    fn resolve_projects(&mut self, package: &mut Package) -> Result<(), ResolveError> {
        self.active.push(package.name.clone());
        let result = self.resolve_dependencies(package);
        self.active.pop();
        result
    }

    fn resolve_dependencies(&mut self, package: &mut Package) -> Result<(), ResolveError> {
        for index in 0..package.projects.len() {
            for access in Access::ALL {
                let count = package.projects[index]
                    .config
                    .dependencies
                    .declared
                    .get(access)
                    .len();

                for slot in 0..count {
                    let dep = package.projects[index].config.dependencies.declared.get(access)
                        [slot]
                        .clone();
                    self.resolve_dependency(package, index, access, slot, dep)?;
                }
            }
        }
        Ok(())
    }

    fn resolve_dependency(
        &mut self,
        package: &mut Package,
        index: usize,
        access: Access,
        slot: usize,
        dep: Dependency,
    ) -> Result<(), ResolveError> {
        tracing::debug!(
            "Resolving {} dependency `{}` of `{}`",
            access,
            dep.describe(),
            package.projects[index].name
        );

        match dep {
            Dependency::Raw(token) => {
                package.projects[index]
                    .config
                    .linked_libraries
                    .computed
                    .get_mut(access)
                    .push(token);
            }

            Dependency::SelfProject(sd) => {
                let sibling = package
                    .find_project(&sd.target)
                    .cloned()
                    .ok_or_else(|| project_not_found(&sd.target, package))?;

                inherit_configuration_from(
                    &mut package.projects[index],
                    &MergeSource::sibling(&package.root, &sibling),
                    access,
                );
                self.stats.merges += 1;
            }

            Dependency::Package(pd) => {
                let loaded = match pd.resolved() {
                    Some(loaded) => Rc::clone(loaded),
                    None => self.acquire(&pd)?,
                };

                if let Dependency::Package(declared) =
                    &mut package.projects[index].config.dependencies.declared.get_mut(access)[slot]
                {
                    declared.bind(Rc::clone(&loaded));
                }

                for name in &pd.projects {
                    let remote = loaded
                        .find_project(name)
                        .ok_or_else(|| project_not_found(name, &loaded))?;

                    inherit_configuration_from(
                        &mut package.projects[index],
                        &MergeSource::package(&loaded, remote),
                        access,
                    );
                    self.stats.merges += 1;
                }
            }
        }
        Ok(())
    }

    /// Load, register and fully resolve a dependency package, or reuse the
    /// instance registered under the same root.
    fn acquire(&mut self, dep: &PackageDependency) -> Result<Rc<Package>, ResolveError> {
        match self.store.load_by_name(&dep.name, &dep.version)? {
            Located::Registered(root) => match self.store.loaded().shared(&root) {
                Some(package) => {
                    tracing::debug!("Reusing `{}` from {}", package, root.display());
                    self.stats.packages_reused += 1;
                    Ok(package)
                }
                None => {
                    let mut packages = self.active.clone();
                    packages.push(dep.name.clone());
                    Err(ResolveError::CycleDetected { packages })
                }
            },

            Located::Fresh(mut package) => {
                tracing::info!("Loaded dependency `{}` ({})", dep, package);
                self.store.register(&package);
                self.stats.packages_loaded += 1;

                self.resolve_projects(&mut package)?;

                let shared = Rc::new(package);
                self.store.loaded_mut().publish(Rc::clone(&shared));
                Ok(shared)
            }
        }
    }
}

fn project_not_found(project: &str, package: &Package) -> ResolveError {
    ResolveError::ProjectNotFound {
        project: project.to_string(),
        package: package.name.clone(),
        available: package.project_names(),
    }
}
