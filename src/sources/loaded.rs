//! Registry of the packages loaded during one resolution session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use semver::Version;

use crate::core::Package;

/// Resolution state of a registered package.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Registered, its own dependencies are still being resolved.
    InProgress,
    /// Fully resolved and shared with every consumer.
    Shared(Rc<Package>),
}

/// A registered package.
#[derive(Debug, Clone)]
pub struct LoadedEntry {
    pub name: String,
    pub version: Version,
    pub state: LoadState,
}

/// Loaded packages, keyed and ordered by canonical root path.
#[derive(Debug, Default)]
pub struct LoadedPackages {
    entries: BTreeMap<PathBuf, LoadedEntry>,
}

impl LoadedPackages {
    pub fn new() -> Self {
        LoadedPackages::default()
    }

    /// Check whether a root has been registered.
    pub fn is_loaded(&self, root: &Path) -> bool {
        self.entries.contains_key(root)
    }

    pub fn get(&self, root: &Path) -> Option<&LoadedEntry> {
        self.entries.get(root)
    }

    /// Register a package as in progress. Returns `false` if its root was
    /// already registered, leaving the existing entry untouched.
    pub fn register(&mut self, package: &Package) -> bool {
        if self.entries.contains_key(package.root()) {
            return false;
        }

        self.entries.insert(
            package.root().to_path_buf(),
            LoadedEntry {
                name: package.name.clone(),
                version: package.version.clone(),
                state: LoadState::InProgress,
            },
        );
        true
    }

    /// Mark a registered package as resolved and share it.
    pub fn publish(&mut self, package: Rc<Package>) {
        if let Some(entry) = self.entries.get_mut(package.root()) {
            entry.state = LoadState::Shared(package);
        }
    }

    /// The shared instance of a resolved package.
    pub fn shared(&self, root: &Path) -> Option<Rc<Package>> {
        match self.entries.get(root).map(|e| &e.state) {
            Some(LoadState::Shared(pkg)) => Some(Rc::clone(pkg)),
            _ => None,
        }
    }

    /// Registered packages in root order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &LoadedEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str, root: &str) -> Package {
        Package::new(name, Version::new(1, 0, 0), root)
    }

    #[test]
    fn test_register_once() {
        let mut loaded = LoadedPackages::new();
        assert!(loaded.register(&pkg("zlib", "/p/zlib")));
        assert!(!loaded.register(&pkg("zlib-again", "/p/zlib")));

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(Path::new("/p/zlib")).unwrap().name, "zlib");
    }

    #[test]
    fn test_publish_shares_package() {
        let mut loaded = LoadedPackages::new();
        let package = pkg("zlib", "/p/zlib");
        loaded.register(&package);
        assert!(loaded.shared(Path::new("/p/zlib")).is_none());

        loaded.publish(Rc::new(package));
        let shared = loaded.shared(Path::new("/p/zlib")).unwrap();
        assert_eq!(shared.name, "zlib");
    }

    #[test]
    fn test_ordered_by_root() {
        let mut loaded = LoadedPackages::new();
        loaded.register(&pkg("c", "/p/c"));
        loaded.register(&pkg("a", "/p/a"));
        loaded.register(&pkg("b", "/p/b"));

        let names: Vec<_> = loaded.iter().map(|(_, e)| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(loaded.is_loaded(Path::new("/p/b")));
        assert!(!loaded.is_loaded(Path::new("/p/d")));
    }
}
