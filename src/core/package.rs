//! Package - a versioned set of projects rooted at a directory.

use std::fmt;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::Serialize;

use crate::core::manifest::{JsonManifestLoader, ManifestError, ManifestLoader, MANIFEST_NAME};
use crate::core::Project;
use crate::util::fs::forward_slashes;

/// Output folder of library projects, relative to the package root. The
/// `%{cfg.*}` tokens are expanded by the build backend.
pub const OUTPUT_FOLDER_PATTERN: &str = "bin/%{cfg.platform}/%{cfg.buildcfg}";

/// A package with its projects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,

    #[serde(serialize_with = "serialize_version")]
    pub version: Version,

    /// Canonical package directory; identifies the package within a session
    pub root: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_project: Option<String>,

    pub projects: Vec<Project>,
}

fn serialize_version<S: serde::Serializer>(v: &Version, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(v)
}

impl Package {
    pub fn new(name: impl Into<String>, version: Version, root: impl Into<PathBuf>) -> Self {
        Package {
            name: name.into(),
            version,
            root: root.into(),
            startup_project: None,
            projects: Vec::new(),
        }
    }

    /// Load the package manifest found in `dir`.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        JsonManifestLoader.load(dir)
    }

    /// Get the package root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the manifest file path.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_NAME)
    }

    /// Get a project by name.
    pub fn find_project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Names of all projects, for diagnostics.
    pub fn project_names(&self) -> Vec<String> {
        self.projects.iter().map(|p| p.name.clone()).collect()
    }

    /// Make a path relative to the package root absolute; absolute paths
    /// are returned unchanged.
    pub fn resolve_path(&self, path: &str) -> String {
        resolve_against(&self.root, path)
    }

    /// Where the build backend places the artifacts of `project`.
    pub fn predict_output_folder(&self, project: &Project) -> String {
        predict_output_folder(&self.root, project)
    }
}

/// Output folder of a project of the package rooted at `root`.
pub fn predict_output_folder(root: &Path, _project: &Project) -> String {
    forward_slashes(&root.join(OUTPUT_FOLDER_PATTERN))
}

/// Resolve `path` against `root` when relative.
pub fn resolve_against(root: &Path, path: &str) -> String {
    let p = Path::new(path);
    if p.is_relative() {
        forward_slashes(&root.join(p))
    } else {
        path.to_string()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProjectType;

    fn sample() -> Package {
        let mut pkg = Package::new("mathlib", Version::new(1, 0, 0), "/deps/mathlib");
        pkg.projects.push(Project::new("mathlib", ProjectType::StaticLib));
        pkg
    }

    #[test]
    fn test_find_project() {
        let pkg = sample();
        assert!(pkg.find_project("mathlib").is_some());
        assert!(pkg.find_project("other").is_none());
        assert_eq!(pkg.project_names(), vec!["mathlib"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_path() {
        let pkg = sample();
        assert_eq!(pkg.resolve_path("include/"), "/deps/mathlib/include/");
        assert_eq!(pkg.resolve_path("/usr/include"), "/usr/include");
    }

    #[cfg(unix)]
    #[test]
    fn test_predict_output_folder() {
        let pkg = sample();
        let out = pkg.predict_output_folder(&pkg.projects[0]);
        assert_eq!(out, "/deps/mathlib/bin/%{cfg.platform}/%{cfg.buildcfg}");
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "mathlib v1.0.0");
    }
}
