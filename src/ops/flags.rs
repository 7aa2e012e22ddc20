//! Compiler and linker flags of a resolved project.
//!
//! Every axis contributes its computed private, public and interface values
//! followed by its declared ones, which is exactly what a build backend
//! emits for the project.

use anyhow::{bail, Result};

use crate::core::configuration::{AxisKind, Configuration};
use crate::core::{Package, Project};

/// Flags for one configuration of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub compile: Vec<String>,
    pub link: Vec<String>,
}

impl FlagSet {
    /// Render the flags of `config`.
    pub fn from_configuration(config: &Configuration) -> Self {
        let values = |kind: AxisKind| config.axis(kind).effective();

        let compile = values(AxisKind::Defines)
            .map(|d| format!("-D{}", d))
            .chain(values(AxisKind::IncludeFolders).map(|p| format!("-I{}", p)))
            .chain(values(AxisKind::CompilerOptions).cloned())
            .collect();

        let link = values(AxisKind::LinkerFolders)
            .map(|p| format!("-L{}", p))
            .chain(values(AxisKind::LinkedLibraries).map(|l| format!("-l{}", l)))
            .chain(values(AxisKind::LinkerOptions).cloned())
            .collect();

        FlagSet { compile, link }
    }
}

/// Flags of `project`, from its base configuration or from one filter.
pub fn project_flags(project: &Project, filter: Option<&str>) -> Result<FlagSet> {
    let config = match filter {
        None => &project.config,
        Some(name) => match project.filters.get(name) {
            Some(config) => config,
            None => {
                let available: Vec<_> = project.filters.keys().map(String::as_str).collect();
                bail!(
                    "project `{}` has no filter `{}` (available: {})",
                    project.name,
                    name,
                    if available.is_empty() {
                        "none".to_string()
                    } else {
                        available.join(", ")
                    }
                );
            }
        },
    };
    Ok(FlagSet::from_configuration(config))
}

/// Look up `project` in `package` and render its flags.
pub fn package_flags(package: &Package, project: &str, filter: Option<&str>) -> Result<FlagSet> {
    match package.find_project(project) {
        Some(found) => project_flags(found, filter),
        None => bail!(
            "package `{}` has no project `{}` (available: {})",
            package.name,
            project,
            package.project_names().join(", ")
        ),
    }
}
