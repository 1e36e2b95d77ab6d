//! Showfetch Library
//!
//! Finds the next unwatched episodes of tracked TV shows, fetches matching
//! Usenet releases and organizes the downloads into a media library.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
