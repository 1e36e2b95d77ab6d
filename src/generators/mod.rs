//! Library path generators.

pub mod filename;
pub mod folder;
