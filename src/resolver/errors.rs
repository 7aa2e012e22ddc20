//! Resolution error types and diagnostics.

use std::path::PathBuf;

use semver::Version;
use thiserror::Error;

use crate::core::manifest::ManifestError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// A package that was found but whose version did not satisfy the
/// requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMismatch {
    pub root: PathBuf,
    pub version: Version,
}

/// Error during dependency resolution. Every variant aborts the session.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("could not find package `{package}`")]
    PackageNotFound {
        package: String,
        requirement: String,
        searched: Vec<PathBuf>,
        mismatch: Option<VersionMismatch>,
    },

    #[error("project `{project}` does not exist in package `{package}`")]
    ProjectNotFound {
        project: String,
        package: String,
        available: Vec<String>,
    },

    #[error("cycle detected in dependency graph")]
    CycleDetected { packages: Vec<String> },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::Manifest(err) => {
                let diag = Diagnostic::error(err.to_string());
                match err {
                    ManifestError::NotFound { .. } => {
                        diag.with_suggestion(suggestions::NO_MANIFEST)
                    }
                    _ => diag,
                }
            }

            ResolveError::PackageNotFound {
                package,
                requirement,
                searched,
                mismatch,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "could not find package `{}` matching `{}`",
                    package, requirement
                ));

                if let Some(found) = mismatch {
                    diag = diag
                        .with_context(format!(
                            "found `{}` v{} but it does not satisfy `{}`",
                            package, found.version, requirement
                        ))
                        .with_location(found.root.clone());
                }

                for dir in searched {
                    diag = diag.with_context(format!("searched {}", dir.display()));
                }

                diag.with_suggestion(suggestions::PACKAGE_NOT_FOUND)
            }

            ResolveError::ProjectNotFound {
                project,
                package,
                available,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "project `{}` does not exist in package `{}`",
                    project, package
                ));

                if !available.is_empty() {
                    diag = diag.with_context(format!("available: {}", available.join(", ")));
                }

                diag.with_suggestion(suggestions::PROJECT_NOT_FOUND)
            }

            ResolveError::CycleDetected { packages } => {
                Diagnostic::error("cycle detected in dependency graph")
                    .with_context(format!("cycle: {}", packages.join(" -> ")))
                    .with_suggestion(
                        "Break the cycle by removing or restructuring dependencies",
                    )
            }
        }
    }
}
