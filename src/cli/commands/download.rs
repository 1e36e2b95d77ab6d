//! Download command implementation.
//!
//! Wires the Trakt, Newznab and NZBGet clients into the acquisition loop.

use crate::core::downloader::{DownloadReport, Downloader, DownloaderConfig};
use crate::core::Reconciler;
use crate::models::config::Config;
use crate::services::newznab::NewznabClient;
use crate::services::nzbget::NzbgetClient;
use crate::services::trakt::TraktClient;
use crate::services::{http_client, ReleaseIndexer};
use crate::Result;
use colored::Colorize;

/// Run the acquisition loop over the whole collection.
pub async fn download(config: &Config, dry_run: bool) -> Result<()> {
    println!("{}", "📺 Fetching next episodes...".bold().cyan());
    if dry_run {
        println!("{}", "  (dry run - nothing will be submitted)".yellow());
    }
    println!();

    config.validate_for_download()?;
    let client = http_client(config.request_timeout_secs)?;

    let history = TraktClient::new(&config.trakt, client.clone())?;
    let indexers: Vec<Box<dyn ReleaseIndexer>> = config
        .enabled_indexers()
        .iter()
        .map(|indexer| {
            Box::new(NewznabClient::new(indexer, config.max_results, client.clone()))
                as Box<dyn ReleaseIndexer>
        })
        .collect();
    let nzbget = NzbgetClient::new(&config.nzbget, client);

    let downloader = Downloader::new(
        DownloaderConfig::from_config(config, dry_run),
        Reconciler::new(&config.matching),
        Box::new(history),
        indexers,
        Box::new(nzbget),
    );
    let report = downloader.run().await?;

    print_report(&report, dry_run);
    Ok(())
}

fn print_report(report: &DownloadReport, dry_run: bool) {
    println!();
    println!("{}", "📊 Download Summary".bold().green());
    let submitted_label = if dry_run { "Would submit:" } else { "Submitted:" };
    println!("  {} {}", submitted_label.bold(), report.submitted.len());
    println!("  {} {}", "Already present:".bold(), report.already_present.len());
    println!("  {} {}", "Not found:".bold(), report.not_found.len());
    println!("  {} {}", "Failed shows:".bold(), report.failed.len());
    println!();

    for (episode, release) in &report.submitted {
        println!("  {} {} {}", "+".green(), episode, format!("({})", release).dimmed());
    }
    for episode in &report.not_found {
        println!("  {} {}", "?".yellow(), episode);
    }
    for (show, error) in &report.failed {
        println!("  {} {} - {}", "!".red(), show, error);
    }
}
