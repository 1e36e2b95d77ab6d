//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Showfetch - fetch unwatched TV episodes and organize them
#[derive(Parser, Debug)]
#[command(name = "showfetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config.toml (defaults to the user config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search and queue the next unwatched episodes of every tracked show
    Download {
        /// Dry run - search and match, but submit nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Move finished downloads into the library
    Organize {
        /// Dry run - show what would be done
        #[arg(long)]
        dry_run: bool,

        /// Do not resolve show names against the Trakt collection
        #[arg(long)]
        no_catalog: bool,
    },

    /// Authorize with Trakt using the device flow
    Authorize,

    /// Show how a name is normalized, parsed and matched
    Inspect {
        /// Release title, folder name or filename
        #[arg(value_name = "NAME")]
        name: String,

        /// Show title to compare against
        #[arg(short, long)]
        show: Option<String>,

        /// Season of the wanted episode
        #[arg(long, requires = "episode")]
        season: Option<u16>,

        /// Episode of the wanted episode
        #[arg(long, requires = "season")]
        episode: Option<u16>,

        /// Release year of the show
        #[arg(short, long)]
        year: Option<u16>,
    },
}
