//! Dependency declarations.
//!
//! A project declares dependencies on raw linker tokens, on sibling
//! projects of the same package, or on projects of another package.

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::core::manifest::ManifestError;
use crate::core::version::{ParsedRequirement, VersionRequirement};
use crate::core::Package;

/// Prefix of a raw linker token declaration.
pub const RAW_PREFIX: &str = "file:";

/// Prefix of a same-package project declaration.
pub const SELF_PREFIX: &str = "self:";

/// One declared dependency.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Dependency {
    /// Opaque linker token, copied verbatim into the linked libraries.
    Raw(String),

    /// Another project of the same package.
    #[serde(rename = "self")]
    SelfProject(SelfDependency),

    /// Projects of another package.
    Package(PackageDependency),
}

/// Back-reference to a sibling project. Used for lookup only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelfDependency {
    /// Project declaring the dependency
    pub project: String,
    /// Name of the sibling project
    pub target: String,
    /// Root of the package owning both projects
    pub package_root: PathBuf,
}

/// Dependency on projects of a named package.
#[derive(Debug, Clone, Serialize)]
pub struct PackageDependency {
    /// Package name, also the folder searched for in candidate directories
    pub name: String,

    /// Version requirement
    pub version: VersionRequirement,

    /// Projects of the package to inherit configuration from
    pub projects: Vec<String>,

    /// Where the package comes from, as written in the manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Set once the resolver has loaded the package
    #[serde(skip)]
    resolved: Option<Rc<Package>>,
}

impl Dependency {
    /// Create a raw linker token dependency.
    pub fn raw(token: impl Into<String>) -> Self {
        Dependency::Raw(token.into())
    }

    /// Create a dependency on a sibling project.
    pub fn self_project(
        project: impl Into<String>,
        target: impl Into<String>,
        package_root: impl Into<PathBuf>,
    ) -> Self {
        Dependency::SelfProject(SelfDependency {
            project: project.into(),
            target: target.into(),
            package_root: package_root.into(),
        })
    }

    /// Create a package dependency on the project of the same name.
    pub fn package(name: impl Into<String>, version: VersionRequirement) -> Self {
        let name = name.into();
        Dependency::Package(PackageDependency::new(name.clone(), version, vec![name]))
    }

    /// Parse one entry of a `dependencies` list.
    ///
    /// `project` is the declaring project and `package_root` the root of its
    /// package, recorded by self-dependencies.
    pub fn from_json(
        value: &Value,
        project: &str,
        package_root: &std::path::Path,
    ) -> Result<Self, ManifestError> {
        match value {
            Value::String(pattern) => Ok(Self::from_pattern(pattern, project, package_root)),
            Value::Object(_) => PackageDependency::from_json(value).map(Dependency::Package),
            other => Err(ManifestError::UnknownDependencyShape {
                project: project.to_string(),
                found: json_type_name(other).to_string(),
            }),
        }
    }

    fn from_pattern(pattern: &str, project: &str, package_root: &std::path::Path) -> Self {
        if let Some(token) = pattern.strip_prefix(RAW_PREFIX) {
            return Dependency::raw(token);
        }
        if let Some(target) = pattern.strip_prefix(SELF_PREFIX) {
            return Dependency::self_project(project, target, package_root);
        }

        let loc = SourceLocator::parse(pattern);
        let version = match loc.reference.as_deref() {
            Some(reference) => lenient_requirement(&loc.repository, reference),
            None => VersionRequirement::Any,
        };

        let dep = PackageDependency::new(
            loc.repository.clone(),
            version,
            vec![loc.repository.clone()],
        )
        .with_source(pattern);
        Dependency::Package(dep)
    }

    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Dependency::Raw(token) => format!("{}{}", RAW_PREFIX, token),
            Dependency::SelfProject(dep) => format!("{}{}", SELF_PREFIX, dep.target),
            Dependency::Package(dep) => dep.to_string(),
        }
    }
}

impl PackageDependency {
    pub fn new(name: impl Into<String>, version: VersionRequirement, projects: Vec<String>) -> Self {
        PackageDependency {
            name: name.into(),
            version,
            projects,
            source: None,
            resolved: None,
        }
    }

    /// Set the source locator.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The loaded package, if already resolved.
    pub fn resolved(&self) -> Option<&Rc<Package>> {
        self.resolved.as_ref()
    }

    /// Bind the loaded package.
    pub fn bind(&mut self, package: Rc<Package>) {
        self.resolved = Some(package);
    }

    fn from_json(value: &Value) -> Result<Self, ManifestError> {
        let name = match value.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => {
                return Err(ManifestError::TypeMismatch {
                    field: "dependency.name".to_string(),
                    expected: "string",
                })
            }
        };

        let source = match value.get("from") {
            Some(Value::String(from)) if !from.is_empty() => Some(from.clone()),
            _ => None,
        };

        let projects = match value.get("projects") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(ManifestError::TypeMismatch {
                        field: format!("dependency `{}` projects element", name),
                        expected: "string",
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                let repository = source
                    .as_deref()
                    .map(|s| SourceLocator::parse(s).repository)
                    .filter(|repo| !repo.is_empty())
                    .unwrap_or_else(|| name.clone());
                vec![repository]
            }
        };

        let version = match value.get("version") {
            Some(Value::String(req)) => lenient_requirement(&name, req),
            _ => VersionRequirement::Any,
        };

        Ok(PackageDependency {
            name,
            version,
            projects,
            source,
            resolved: None,
        })
    }
}

impl fmt::Display for PackageDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_any() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}@{}", self.name, self.version)
        }
    }
}

fn lenient_requirement(package: &str, input: &str) -> VersionRequirement {
    let parsed = VersionRequirement::parse_lenient(input);
    if let ParsedRequirement::Unconstrained { input, reason } = &parsed {
        tracing::warn!(
            "Ignoring version requirement `{}` of dependency `{}` ({}); any version will do",
            input,
            package,
            reason
        );
    }
    parsed.requirement()
}

/// A parsed `[<host>:]<path>[@<ref>]` source locator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocator {
    /// Hosting service or URL scheme (`github`, `https`)
    pub host: Option<String>,
    /// Repository path (`user/repo`)
    pub path: String,
    /// Last path segment, used as the package name
    pub repository: String,
    /// Branch, tag or version after `@`
    pub reference: Option<String>,
}

impl SourceLocator {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let (rest, reference) = match s.rsplit_once('@') {
            Some((rest, reference)) if !reference.is_empty() => (rest, Some(reference.to_string())),
            Some((rest, _)) => (rest, None),
            None => (s, None),
        };

        let (host, path) = if let Some((scheme, tail)) = rest.split_once("://") {
            (Some(scheme.to_string()), tail)
        } else if let Some((host, tail)) = rest.split_once(':') {
            (Some(host.to_string()), tail)
        } else {
            (None, rest)
        };

        let path = path.trim_matches('/');
        let repository = path
            .rsplit('/')
            .next()
            .unwrap_or("")
            .trim_end_matches(".git")
            .to_string();

        SourceLocator {
            host,
            path: path.to_string(),
            repository,
            reference,
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
