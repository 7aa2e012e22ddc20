//! Dependency resolution.
//!
//! Resolution is single-threaded and depth-first: a dependency package is
//! loaded, registered and fully resolved before anything is merged from it.
//! Private settings never leave the project that declares them.

pub mod errors;
pub mod merge;
pub mod resolve;

pub use errors::{ResolveError, VersionMismatch};
pub use merge::{compute_configuration, inherit_configuration_from, merge_axis, MergeSource};
pub use resolve::{ResolveStats, Resolver};
