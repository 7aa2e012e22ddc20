//! Dependency tree rendering.

use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;

use crate::core::{Access, Dependency, Package};

/// Options for [`render_tree`].
#[derive(Debug, Clone, Copy)]
pub struct TreeOptions {
    /// Maximum depth to print
    pub max_depth: usize,
    /// Expand packages that were already printed
    pub duplicates: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            max_depth: usize::MAX,
            duplicates: false,
        }
    }
}

/// Render the resolved dependency tree of `root`, one package per line.
///
/// Packages already shown are marked `(*)` and not expanded again unless
/// [`TreeOptions::duplicates`] is set.
pub fn render_tree(root: &Package, opts: TreeOptions) -> String {
    let mut out = format!("{} v{}\n", root.name, root.version);
    let mut seen = HashSet::new();
    seen.insert(root.root.clone());
    render_children(root, 1, opts, &mut seen, &mut out);
    out
}

fn render_children(
    package: &Package,
    depth: usize,
    opts: TreeOptions,
    seen: &mut HashSet<PathBuf>,
    out: &mut String,
) {
    if depth > opts.max_depth {
        return;
    }

    for (project, access, dep) in package_dependencies(package) {
        let prefix = format!("{}├── ", "│   ".repeat(depth - 1));
        let Some(resolved) = dep else {
            continue;
        };

        let is_duplicate = !seen.insert(resolved.root.clone());
        let dup_marker = if is_duplicate && !opts.duplicates {
            " (*)"
        } else {
            ""
        };

        out.push_str(&format!(
            "{}{} v{} [{} {}]{}\n",
            prefix, resolved.name, resolved.version, project, access, dup_marker
        ));

        if is_duplicate && !opts.duplicates {
            continue;
        }
        render_children(&resolved, depth + 1, opts, seen, out);
    }
}

/// Package dependencies of every project, in resolution order.
fn package_dependencies(
    package: &Package,
) -> impl Iterator<Item = (&str, Access, Option<Rc<Package>>)> {
    package.projects.iter().flat_map(|project| {
        Access::ALL.into_iter().flat_map(move |access| {
            project
                .config
                .dependencies
                .declared
                .get(access)
                .iter()
                .filter_map(move |dep| match dep {
                    Dependency::Package(pd) => {
                        Some((project.name.as_str(), access, pd.resolved().cloned()))
                    }
                    _ => None,
                })
        })
    })
}
