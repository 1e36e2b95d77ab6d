//! Showfetch CLI
//!
//! Fetches the next unwatched episodes of tracked TV shows from Usenet and
//! organizes finished downloads into a media library.

use clap::Parser;
use showfetch::cli::{
    args::{Cli, Commands},
    commands::{authorize, download, inspect, organize},
};
use showfetch::models::config::Config;
use showfetch::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    // Run the appropriate command
    match cli.command {
        Commands::Download { dry_run } => {
            // Run preflight checks unless skipped
            if !cli.skip_preflight {
                run_preflight_checks(&config).await?;
            }
            download::download(&config, dry_run).await?;
        }

        Commands::Organize { dry_run, no_catalog } => {
            organize::organize(&config, dry_run, no_catalog).await?;
        }

        Commands::Authorize => {
            authorize::authorize(&config).await?;
        }

        Commands::Inspect {
            name,
            show,
            season,
            episode,
            year,
        } => {
            let target = inspect::InspectTarget {
                show,
                season,
                episode,
                year,
            };
            inspect::inspect(&config, &name, &target)?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("showfetch=debug")
    } else {
        EnvFilter::new("showfetch=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(config: &Config) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config).await?;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
