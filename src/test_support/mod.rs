//! Test fixtures for package trees on disk.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::core::manifest::MANIFEST_NAME;

/// Builder for a `cpackage.json` package written to a temporary directory.
#[derive(Debug, Clone)]
pub struct PackageFixture {
    name: String,
    version: String,
    projects: Vec<Value>,
}

impl PackageFixture {
    /// A package with no projects.
    pub fn new(name: impl Into<String>) -> Self {
        PackageFixture {
            name: name.into(),
            version: "1.0.0".to_string(),
            projects: Vec::new(),
        }
    }

    /// A package holding one static library project of the same name.
    pub fn library(name: impl Into<String>) -> Self {
        let name = name.into();
        let project = json!({ "name": name, "type": "static lib" });
        Self::new(name).project(project)
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Add a project, given as its manifest JSON.
    pub fn project(mut self, project: Value) -> Self {
        self.projects.push(project);
        self
    }

    pub fn to_json(&self) -> String {
        let manifest = json!({
            "name": self.name,
            "version": self.version,
            "projects": self.projects,
        });
        serde_json::to_string_pretty(&manifest).unwrap()
    }

    /// Write the package to `<parent>/<name>/` and return that directory.
    pub fn write_into(&self, parent: &Path) -> PathBuf {
        let dir = parent.join(&self.name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MANIFEST_NAME), self.to_json()).unwrap();
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Package;
    use tempfile::TempDir;

    #[test]
    fn test_fixture_round_trips_through_loader() {
        let tmp = TempDir::new().unwrap();
        let dir = PackageFixture::library("zlib").version("1.3.1").write_into(tmp.path());

        let pkg = Package::load(&dir).unwrap();
        assert_eq!(pkg.name, "zlib");
        assert_eq!(pkg.version.to_string(), "1.3.1");
        assert_eq!(pkg.projects.len(), 1);
    }
}
