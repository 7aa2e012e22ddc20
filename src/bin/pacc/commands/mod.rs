//! Command implementations

pub mod flags;
pub mod resolve;
pub mod tree;
