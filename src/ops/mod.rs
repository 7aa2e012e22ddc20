//! High-level operations.
//!
//! This module contains the implementation of pacc commands.

pub mod flags;
pub mod resolve;
pub mod tree;

pub use flags::{package_flags, project_flags, FlagSet};
pub use resolve::{package_warnings, resolve_at, resolve_package, LoadedSummary, ResolvedPackage};
pub use tree::{render_tree, TreeOptions};
