//! pacc - a package manager for C and C++ projects
//!
//! This crate provides the core library functionality for pacc: reading
//! `cpackage.json` manifests, locating dependency packages on disk, and
//! resolving the private/public/interface build settings every project
//! inherits from its dependencies.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities for pacc unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It writes package fixtures to temporary directories.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    configuration::Configuration, dependency::Dependency, package::Package, project::Project,
    version::VersionRequirement,
};

pub use resolver::{ResolveError, Resolver};
pub use util::context::GlobalContext;
