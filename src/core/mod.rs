//! Core business logic modules.
//!
//! `normalize`, `parser`, `similarity`, `resolver` and `reconcile` form the
//! pure matching core; the remaining modules do I/O on top of it.

pub mod downloader;
pub mod normalize;
pub mod organizer;
pub mod parser;
pub mod reconcile;
pub mod resolver;
pub mod scanner;
pub mod similarity;

pub use normalize::normalize_name;
pub use parser::extract_identity;
pub use reconcile::Reconciler;
pub use resolver::BestMatchResolver;
pub use similarity::{similar, Matcher, Metric, Similarity};
