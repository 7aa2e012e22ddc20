//! Core data structures for pacc.
//!
//! This module contains the foundational types used throughout pacc:
//! - Versions and version requirements
//! - Dependencies and their declaration grammar
//! - Access-split configurations, projects and packages
//! - The `cpackage.json` manifest reader

pub mod configuration;
pub mod dependency;
pub mod manifest;
pub mod package;
pub mod project;
pub mod version;

pub use configuration::{Access, AccessSplit, Axis, AxisKind, Configuration, SymbolVisibility};
pub use dependency::{Dependency, PackageDependency, SelfDependency, SourceLocator};
pub use manifest::{JsonManifestLoader, ManifestError, ManifestLoader, MANIFEST_NAME};
pub use package::Package;
pub use project::{PrecompiledHeader, Project, ProjectType};
pub use version::{ParsedRequirement, VersionError, VersionRequirement};
