//! Configuration merging.
//!
//! Projects the visible (public and interface) state of a dependency project
//! into a consumer's computed state at one access tier. Private values are
//! never read. Nothing is deduplicated: a value reachable through several
//! dependency paths is appended once per path.

use std::path::Path;

use crate::core::configuration::{Access, Axis, AxisKind, Configuration};
use crate::core::package::{predict_output_folder, resolve_against};
use crate::core::{Package, Project};

/// The project configuration is inherited from.
#[derive(Debug, Clone, Copy)]
pub struct MergeSource<'a> {
    /// Root of the package owning `project`
    pub root: &'a Path,
    pub project: &'a Project,
    /// Rewrite relative include and library folders against `root`
    pub rewrite_paths: bool,
}

impl<'a> MergeSource<'a> {
    /// A project of another package; relative paths are rewritten.
    pub fn package(package: &'a Package, project: &'a Project) -> Self {
        MergeSource {
            root: package.root(),
            project,
            rewrite_paths: true,
        }
    }

    /// A project of the consumer's own package; paths are kept as written.
    pub fn sibling(root: &'a Path, project: &'a Project) -> Self {
        MergeSource {
            root,
            project,
            rewrite_paths: false,
        }
    }
}

/// Append the visible values of `source` to `target.computed[access]`.
///
/// Order: computed interface, computed public, declared interface,
/// declared public.
pub fn merge_axis<T, F>(target: &mut Axis<T>, source: &Axis<T>, access: Access, map: F)
where
    T: Clone,
    F: Fn(&T) -> T,
{
    let values = source
        .computed
        .visible()
        .chain(source.declared.visible())
        .map(map);
    target.computed.get_mut(access).extend(values);
}

/// Merge one configuration (base or filter) of `source.project` into `into`.
///
/// Library projects additionally contribute their output folder and their
/// own name to the consumer's library folders and linked libraries.
pub fn compute_configuration(
    into: &mut Configuration,
    source: &MergeSource<'_>,
    from: &Configuration,
    access: Access,
) {
    for kind in AxisKind::ALL {
        let (target, origin) = (into.axis_mut(kind), from.axis(kind));
        if source.rewrite_paths && kind.holds_paths() {
            merge_axis(target, origin, access, |path| resolve_against(source.root, path));
        } else {
            merge_axis(target, origin, access, String::clone);
        }
    }

    if source.project.kind.is_library() {
        into.linker_folders
            .computed
            .get_mut(access)
            .push(predict_output_folder(source.root, source.project));
        into.linked_libraries
            .computed
            .get_mut(access)
            .push(source.project.name.clone());
    }
}

/// Inherit the base configuration and every filter overlay of
/// `source.project` into `into` at `access`.
///
/// Filters missing on `into` are created empty first.
pub fn inherit_configuration_from(into: &mut Project, source: &MergeSource<'_>, access: Access) {
    tracing::debug!(
        "Merging `{}` into `{}` ({})",
        source.project.name,
        into.name,
        access
    );

    compute_configuration(&mut into.config, source, &source.project.config, access);

    for (name, filter) in &source.project.filters {
        compute_configuration(into.filter_mut(name), source, filter, access);
    }
}
