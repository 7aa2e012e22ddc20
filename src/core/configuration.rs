//! Visibility-split build configuration.
//!
//! Every setting a project declares belongs to one of three access tiers:
//! - `private`: used by the declaring project only
//! - `public`: used by the declaring project and by its dependents
//! - `interface`: used by dependents only (header-only targets)
//!
//! Each configuration axis keeps the values declared in the manifest apart
//! from the values computed by the resolver.

use std::fmt;

use serde::Serialize;

use crate::core::dependency::Dependency;

/// Access tier of a configuration value or dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Private,
    Public,
    Interface,
}

impl Access {
    /// All tiers, in the order dependencies are resolved.
    pub const ALL: [Access; 3] = [Access::Private, Access::Public, Access::Interface];

    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Private => "private",
            Access::Public => "public",
            Access::Interface => "interface",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three independent ordered sequences, one per access tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessSplit<T> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub private: Vec<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub public: Vec<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interface: Vec<T>,
}

impl<T> Default for AccessSplit<T> {
    fn default() -> Self {
        AccessSplit {
            private: Vec::new(),
            public: Vec::new(),
            interface: Vec::new(),
        }
    }
}

impl<T> AccessSplit<T> {
    pub fn get(&self, access: Access) -> &Vec<T> {
        match access {
            Access::Private => &self.private,
            Access::Public => &self.public,
            Access::Interface => &self.interface,
        }
    }

    pub fn get_mut(&mut self, access: Access) -> &mut Vec<T> {
        match access {
            Access::Private => &mut self.private,
            Access::Public => &mut self.public,
            Access::Interface => &mut self.interface,
        }
    }

    /// Values visible to dependents: interface first, then public.
    pub fn visible(&self) -> impl Iterator<Item = &T> {
        self.interface.iter().chain(self.public.iter())
    }

    /// All values: private, public, interface.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.private
            .iter()
            .chain(self.public.iter())
            .chain(self.interface.iter())
    }

    pub fn len(&self) -> usize {
        self.private.len() + self.public.len() + self.interface.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One configuration axis: declared values and resolver-computed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Axis<T> {
    /// Values from the manifest (`self`)
    #[serde(rename = "self")]
    pub declared: AccessSplit<T>,

    /// Values inherited from dependencies
    pub computed: AccessSplit<T>,
}

impl<T> Default for Axis<T> {
    fn default() -> Self {
        Axis {
            declared: AccessSplit::default(),
            computed: AccessSplit::default(),
        }
    }
}

impl<T> Axis<T> {
    /// Everything a build backend emits for this axis: the computed values
    /// of every tier followed by the declared ones.
    pub fn effective(&self) -> impl Iterator<Item = &T> {
        self.computed.iter().chain(self.declared.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty() && self.computed.is_empty()
    }
}

/// The six mergeable string axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Defines,
    IncludeFolders,
    LinkerFolders,
    CompilerOptions,
    LinkerOptions,
    LinkedLibraries,
}

impl AxisKind {
    pub const ALL: [AxisKind; 6] = [
        AxisKind::Defines,
        AxisKind::IncludeFolders,
        AxisKind::LinkerFolders,
        AxisKind::CompilerOptions,
        AxisKind::LinkerOptions,
        AxisKind::LinkedLibraries,
    ];

    /// Whether values on this axis are filesystem paths.
    pub fn holds_paths(&self) -> bool {
        matches!(self, AxisKind::IncludeFolders | AxisKind::LinkerFolders)
    }

    /// Manifest field name.
    pub fn field_name(&self) -> &'static str {
        match self {
            AxisKind::Defines => "defines",
            AxisKind::IncludeFolders => "includeFolders",
            AxisKind::LinkerFolders => "linkerFolders",
            AxisKind::CompilerOptions => "compilerOptions",
            AxisKind::LinkerOptions => "linkerOptions",
            AxisKind::LinkedLibraries => "linkedLibraries",
        }
    }
}

/// GNU symbol visibility setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SymbolVisibility {
    #[default]
    Default,
    Hidden,
    InlinesHidden,
    Protected,
    Internal,
}

impl SymbolVisibility {
    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        const NAMES: [(&str, SymbolVisibility); 5] = [
            ("default", SymbolVisibility::Default),
            ("hidden", SymbolVisibility::Hidden),
            ("inlineshidden", SymbolVisibility::InlinesHidden),
            ("protected", SymbolVisibility::Protected),
            ("internal", SymbolVisibility::Internal),
        ];

        NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

/// Mergeable build state of a project or of one filter overlay.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub defines: Axis<String>,
    pub include_folders: Axis<String>,
    pub linker_folders: Axis<String>,
    pub compiler_options: Axis<String>,
    pub linker_options: Axis<String>,
    pub linked_libraries: Axis<String>,
    pub dependencies: Axis<Dependency>,

    /// Source files, not visibility-split
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    pub symbol_visibility: SymbolVisibility,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_definition_file: Option<String>,
}

impl Configuration {
    pub fn axis(&self, kind: AxisKind) -> &Axis<String> {
        match kind {
            AxisKind::Defines => &self.defines,
            AxisKind::IncludeFolders => &self.include_folders,
            AxisKind::LinkerFolders => &self.linker_folders,
            AxisKind::CompilerOptions => &self.compiler_options,
            AxisKind::LinkerOptions => &self.linker_options,
            AxisKind::LinkedLibraries => &self.linked_libraries,
        }
    }

    pub fn axis_mut(&mut self, kind: AxisKind) -> &mut Axis<String> {
        match kind {
            AxisKind::Defines => &mut self.defines,
            AxisKind::IncludeFolders => &mut self.include_folders,
            AxisKind::LinkerFolders => &mut self.linker_folders,
            AxisKind::CompilerOptions => &mut self.compiler_options,
            AxisKind::LinkerOptions => &mut self.linker_options,
            AxisKind::LinkedLibraries => &mut self.linked_libraries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_access_split_tiers() {
        let mut split = AccessSplit::default();
        split.get_mut(Access::Private).push("a".to_string());
        split.get_mut(Access::Public).push("b".to_string());
        split.get_mut(Access::Interface).push("c".to_string());

        assert_eq!(split.len(), 3);
        assert_eq!(split.get(Access::Public), &strs(&["b"]));
        let visible: Vec<_> = split.visible().cloned().collect();
        assert_eq!(visible, strs(&["c", "b"]));
    }

    #[test]
    fn test_axis_effective_order() {
        let mut axis: Axis<String> = Axis::default();
        axis.declared.public.push("own".to_string());
        axis.computed.private.push("dep-private-tier".to_string());
        axis.computed.interface.push("dep-interface-tier".to_string());

        let values: Vec<_> = axis.effective().cloned().collect();
        assert_eq!(values, strs(&["dep-private-tier", "dep-interface-tier", "own"]));
    }

    #[test]
    fn test_symbol_visibility_lookup() {
        assert_eq!(SymbolVisibility::from_name("Hidden"), Some(SymbolVisibility::Hidden));
        assert_eq!(
            SymbolVisibility::from_name("inlineshidden"),
            Some(SymbolVisibility::InlinesHidden)
        );
        assert_eq!(SymbolVisibility::from_name("bogus"), None);
    }

    #[test]
    fn test_only_path_axes_hold_paths() {
        let paths: Vec<_> = AxisKind::ALL.iter().filter(|k| k.holds_paths()).collect();
        assert_eq!(paths, vec![&AxisKind::IncludeFolders, &AxisKind::LinkerFolders]);
    }
}
