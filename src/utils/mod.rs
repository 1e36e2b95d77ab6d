//! Utilities.

pub mod fs;
