//! Organize command implementation.

use crate::core::organizer::{OrganizeReport, Organizer};
use crate::core::Reconciler;
use crate::models::config::Config;
use crate::models::media::ShowRef;
use crate::services::trakt::TraktClient;
use crate::services::{http_client, WatchHistory};
use crate::Result;
use colored::Colorize;

/// Move finished downloads into the library.
pub async fn organize(config: &Config, dry_run: bool, no_catalog: bool) -> Result<()> {
    println!("{}", "📁 Organizing downloads...".bold().cyan());
    println!("  {} {}", "Source:".bold(), config.paths.unorganized.display());
    println!("  {} {}", "Library:".bold(), config.paths.library.display());
    println!();

    let catalog = if no_catalog {
        Vec::new()
    } else {
        load_catalog(config).await
    };

    let organizer = Organizer::new(&config.paths, Reconciler::new(&config.matching))
        .with_catalog(catalog)
        .dry_run(dry_run);
    let report = organizer.run()?;

    print_report(&report, dry_run);
    Ok(())
}

/// The Trakt collection, or nothing when Trakt is not set up or unreachable.
async fn load_catalog(config: &Config) -> Vec<ShowRef> {
    let trakt = match http_client(config.request_timeout_secs)
        .and_then(|client| TraktClient::new(&config.trakt, client))
    {
        Ok(trakt) => trakt,
        Err(e) => {
            tracing::debug!("Organizing without catalog: {}", e);
            return Vec::new();
        }
    };
    match trakt.collection().await {
        Ok(shows) => {
            tracing::info!("Resolving names against {} collection shows", shows.len());
            shows
        }
        Err(e) => {
            tracing::warn!("Could not load Trakt collection: {}", e);
            Vec::new()
        }
    }
}

fn print_report(report: &OrganizeReport, dry_run: bool) {
    println!();
    println!("{}", "📊 Organize Summary".bold().green());
    let moved_label = if dry_run { "Would move:" } else { "Moved:" };
    println!("  {} {}", moved_label.bold(), report.moved.len());
    println!("  {} {}", "Skipped:".bold(), report.skipped.len());
    println!("  {} {}", "Folders removed:".bold(), report.removed_dirs.len());
    println!();

    for moved in &report.moved {
        println!("  {} {}", "->".green(), moved.to.display());
    }
    for skipped in &report.skipped {
        println!("  {} {} - {}", "!".yellow(), skipped.path.display(), skipped.reason);
    }
}
