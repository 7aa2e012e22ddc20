//! Package sources.
//!
//! Dependency packages are found by name in an ordered list of local
//! candidate directories. Every package root is loaded at most once per
//! resolution session.

pub mod loaded;
pub mod store;

pub use loaded::{LoadState, LoadedEntry, LoadedPackages};
pub use store::{Located, PackageStore};
