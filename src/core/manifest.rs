//! `cpackage.json` manifest reading.
//!
//! Turns a manifest into an unresolved [`Package`]: declared settings are
//! filled in, computed settings are empty and package dependencies are not
//! yet bound to loaded packages.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::configuration::{Access, AccessSplit, AxisKind, Configuration, SymbolVisibility};
use crate::core::dependency::{json_type_name, Dependency};
use crate::core::project::{PrecompiledHeader, Project, ProjectType};
use crate::core::version::{parse_version, VersionError};
use crate::core::Package;
use crate::util::fs::normalize_path;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "cpackage.json";

/// Errors raised while reading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("no {} found in {}", MANIFEST_NAME, dir.display())]
    NotFound { dir: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid type of `{field}` (expected {expected})")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("invalid dependency in project `{project}`: a {found} is neither a string nor an object")]
    UnknownDependencyShape { project: String, found: String },

    #[error("invalid package version: {0}")]
    Version(#[from] VersionError),
}

/// Reads a package from its directory.
pub trait ManifestLoader {
    /// Load the unresolved package rooted at `dir`.
    fn load(&self, dir: &Path) -> Result<Package, ManifestError>;
}

/// Loader for `cpackage.json` manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonManifestLoader;

impl ManifestLoader for JsonManifestLoader {
    fn load(&self, dir: &Path) -> Result<Package, ManifestError> {
        let path = dir.join(MANIFEST_NAME);
        if !path.is_file() {
            return Err(ManifestError::NotFound {
                dir: dir.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ManifestError::Io {
            path: path.clone(),
            source,
        })?;

        parse_manifest(&contents, &normalize_path(dir)).map_err(|e| match e {
            ManifestError::Parse { source, .. } => ManifestError::Parse { path, source },
            other => other,
        })
    }
}

/// Parse manifest text for a package rooted at `root`.
pub fn parse_manifest(contents: &str, root: &Path) -> Result<Package, ManifestError> {
    let path = root.join(MANIFEST_NAME);
    let value: Value = serde_json::from_str(contents).map_err(|source| ManifestError::Parse {
        path: path.clone(),
        source,
    })?;

    let Value::Object(fields) = &value else {
        return Err(ManifestError::TypeMismatch {
            field: "manifest".to_string(),
            expected: "object",
        });
    };

    let name = required_string(fields, "name", "name", &path)?;
    let version = optional_string(fields, "version", "version")?;
    let version = parse_version(version.as_deref().unwrap_or("0"))?;

    let mut package = Package::new(name, version, root);
    package.startup_project =
        optional_string(fields, "startupProject", "startupProject")?.filter(|s| !s.is_empty());

    let projects = match fields.get("projects") {
        Some(Value::Array(projects)) => projects,
        Some(_) => {
            return Err(ManifestError::TypeMismatch {
                field: "projects".to_string(),
                expected: "array",
            })
        }
        None => return Err(missing_field("projects", &path)),
    };

    package.projects.reserve(projects.len());
    for project in projects {
        let Value::Object(project) = project else {
            return Err(ManifestError::TypeMismatch {
                field: "projects element".to_string(),
                expected: "object",
            });
        };
        package.projects.push(load_project(project, root, &path)?);
    }

    Ok(package)
}

fn load_project(
    fields: &Map<String, Value>,
    root: &Path,
    path: &Path,
) -> Result<Project, ManifestError> {
    let name = required_string(fields, "name", "project name", path)?;
    let kind = required_string(fields, "type", &format!("project `{}` type", name), path)?;

    let mut project = Project::new(name, ProjectType::parse(&kind));
    project.language = optional_string(fields, "language", "language")?;
    project.pch = match fields.get("pch") {
        None => None,
        Some(Value::Object(pch)) => Some(PrecompiledHeader {
            header: required_string(pch, "header", "pch.header", path)?,
            source: required_string(pch, "source", "pch.source", path)?,
            definition: required_string(pch, "definition", "pch.definition", path)?,
        }),
        Some(_) => {
            return Err(ManifestError::TypeMismatch {
                field: format!("project `{}` pch", project.name),
                expected: "object",
            })
        }
    };

    project.config = load_configuration(&project, root, fields)?;

    match fields.get("filters") {
        None => {}
        Some(Value::Object(filters)) => {
            for (filter, value) in filters {
                // Non-object filters carry nothing to load.
                if let Value::Object(settings) = value {
                    let config = load_configuration(&project, root, settings)?;
                    project.filters.insert(filter.clone(), config);
                }
            }
        }
        Some(_) => {
            return Err(ManifestError::TypeMismatch {
                field: format!("project `{}` filters", project.name),
                expected: "object",
            })
        }
    }

    Ok(project)
}

/// A required string member. Absence is a parse error.
fn required_string(
    fields: &Map<String, Value>,
    key: &'static str,
    field: &str,
    path: &Path,
) -> Result<String, ManifestError> {
    optional_string(fields, key, field)?.ok_or_else(|| missing_field(key, path))
}

fn optional_string(
    fields: &Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<Option<String>, ManifestError> {
    match fields.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ManifestError::TypeMismatch {
            field: field.to_string(),
            expected: "string",
        }),
    }
}

fn missing_field(key: &'static str, path: &Path) -> ManifestError {
    ManifestError::Parse {
        path: path.to_path_buf(),
        source: <serde_json::Error as serde::de::Error>::missing_field(key),
    }
}

fn load_configuration(
    project: &Project,
    root: &Path,
    settings: &Map<String, Value>,
) -> Result<Configuration, ManifestError> {
    let is_interface = project.kind == ProjectType::Interface;
    let default_access = if is_interface {
        Access::Interface
    } else {
        Access::Private
    };

    let mut config = Configuration::default();

    config.symbol_visibility = match settings.get("symbolVisibility") {
        Some(Value::String(name)) => SymbolVisibility::from_name(name).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown symbol visibility `{}` in project `{}`, using Default",
                name,
                project.name
            );
            SymbolVisibility::Default
        }),
        Some(_) => {
            return Err(ManifestError::TypeMismatch {
                field: "symbolVisibility".to_string(),
                expected: "string",
            })
        }
        None => SymbolVisibility::Default,
    };

    config.module_definition_file = optional_string(
        settings,
        "moduleDefinitionFile",
        "moduleDefinitionFile",
    )?
    .filter(|path| !path.is_empty());

    if let Some(files) = settings.get("files") {
        config.files = string_list(files, "files")?;
    }

    for kind in [
        AxisKind::Defines,
        AxisKind::IncludeFolders,
        AxisKind::LinkerFolders,
        AxisKind::CompilerOptions,
        AxisKind::LinkerOptions,
    ] {
        if let Some(value) = settings.get(kind.field_name()) {
            config.axis_mut(kind).declared =
                access_split(value, kind.field_name(), default_access)?;
        }
    }

    if let Some(deps) = settings.get("dependencies") {
        let declared = &mut config.dependencies.declared;
        match deps {
            Value::Array(_) => {
                *declared.get_mut(default_access) = dependency_list(deps, project, root)?;
            }
            Value::Object(split) => {
                if is_interface {
                    if split.contains_key("public") || split.contains_key("private") {
                        tracing::warn!(
                            "Interface project `{}` cannot include public or private dependencies (ignored)",
                            project.name
                        );
                    }
                } else {
                    for access in [Access::Public, Access::Private] {
                        if let Some(list) = split.get(access.as_str()) {
                            *declared.get_mut(access) = dependency_list(list, project, root)?;
                        }
                    }
                }

                if let Some(list) = split.get("interface") {
                    declared.interface = dependency_list(list, project, root)?;
                }
            }
            _ => {
                return Err(ManifestError::TypeMismatch {
                    field: "dependencies".to_string(),
                    expected: "array or object",
                })
            }
        }
    }

    Ok(config)
}

fn dependency_list(
    value: &Value,
    project: &Project,
    root: &Path,
) -> Result<Vec<Dependency>, ManifestError> {
    let Value::Array(items) = value else {
        return Err(ManifestError::TypeMismatch {
            field: "dependencies".to_string(),
            expected: "array",
        });
    };

    items
        .iter()
        .map(|item| Dependency::from_json(item, &project.name, root))
        .collect()
}

/// A string or an array of strings.
fn string_list(value: &Value, field: &str) -> Result<Vec<String>, ManifestError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(ManifestError::TypeMismatch {
                    field: format!("{} element", field),
                    expected: "string",
                }),
            })
            .collect(),
        _ => Err(ManifestError::TypeMismatch {
            field: field.to_string(),
            expected: "string or array",
        }),
    }
}

/// A string list in the default tier, or an object split by tier.
fn access_split(
    value: &Value,
    field: &str,
    default_access: Access,
) -> Result<AccessSplit<String>, ManifestError> {
    let mut split = AccessSplit::default();
    match value {
        Value::String(_) | Value::Array(_) => {
            *split.get_mut(default_access) = string_list(value, field)?;
        }
        Value::Object(tiers) => {
            for access in Access::ALL {
                if let Some(values) = tiers.get(access.as_str()) {
                    *split.get_mut(access) =
                        string_list(values, &format!("{}.{}", field, access))?;
                }
            }
        }
        other => {
            tracing::debug!("`{}` is a {}", field, json_type_name(other));
            return Err(ManifestError::TypeMismatch {
                field: field.to_string(),
                expected: "string, array or object",
            });
        }
    }
    Ok(split)
}
