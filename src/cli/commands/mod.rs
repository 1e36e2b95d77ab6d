//! CLI command implementations.

pub mod authorize;
pub mod download;
pub mod inspect;
pub mod organize;
