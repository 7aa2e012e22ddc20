//! Projects - the buildable targets of a package.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::configuration::Configuration;

/// The kind of artifact a project produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ProjectType {
    /// Executable
    App,
    /// Static library (.a / .lib)
    StaticLib,
    /// Shared library (.so / .dylib / .dll)
    SharedLib,
    /// Header-only / interface target, builds nothing
    Interface,
    #[default]
    Unknown,
}

impl ProjectType {
    /// Parse a manifest `type` value, ignoring case.
    pub fn parse(s: &str) -> Self {
        const NAMES: [(&str, ProjectType); 4] = [
            ("app", ProjectType::App),
            ("static lib", ProjectType::StaticLib),
            ("shared lib", ProjectType::SharedLib),
            ("interface", ProjectType::Interface),
        ];

        NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(_, kind)| *kind)
            .unwrap_or(ProjectType::Unknown)
    }

    /// Check if this produces a linkable library.
    pub fn is_library(&self) -> bool {
        matches!(self, ProjectType::StaticLib | ProjectType::SharedLib)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::App => "app",
            ProjectType::StaticLib => "static lib",
            ProjectType::SharedLib => "shared lib",
            ProjectType::Interface => "interface",
            ProjectType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precompiled header settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecompiledHeader {
    pub header: String,
    pub source: String,
    pub definition: String,
}

/// A buildable target within a package.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    /// Unique within the owning package
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ProjectType,

    /// Language and dialect, e.g. `C++17`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pch: Option<PrecompiledHeader>,

    /// Base configuration
    #[serde(flatten)]
    pub config: Configuration,

    /// Per-filter overlays (e.g. `configurations:Debug`)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, Configuration>,
}

impl Project {
    pub fn new(name: impl Into<String>, kind: ProjectType) -> Self {
        Project {
            name: name.into(),
            kind,
            language: None,
            pch: None,
            config: Configuration::default(),
            filters: BTreeMap::new(),
        }
    }

    /// Get a filter overlay, creating an empty one if absent.
    pub fn filter_mut(&mut self, name: &str) -> &mut Configuration {
        self.filters.entry(name.to_string()).or_default()
    }
}
