//! Episode acquisition loop.
//!
//! For every tracked show: ask the watch history for the next episodes,
//! skip those already queued or on disk, then search the indexers one
//! resolution at a time and submit the first wanted release.

use super::reconcile::Reconciler;
use super::scanner::{library_candidates, scan_unorganized};
use crate::models::config::Config;
use crate::models::media::{Candidate, ShowRef, WantedEpisode};
use crate::models::release::Release;
use crate::services::{DownloadClient, ReleaseIndexer, WatchHistory};
use crate::Result;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Downloader configuration.
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Resolutions to try, most preferred first.
    pub resolutions: Vec<String>,
    pub library: PathBuf,
    pub unorganized: PathBuf,
    /// Search and match, but never fetch or submit.
    pub dry_run: bool,
}

impl DownloaderConfig {
    pub fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            resolutions: config.resolutions.clone(),
            library: config.paths.library.clone(),
            unorganized: config.paths.unorganized.clone(),
            dry_run,
        }
    }
}

/// What happened to one wanted episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// A release was submitted (or would be, in dry-run).
    Submitted { release: String, indexer: String },
    /// Already queued, in the library or in the unorganized folder.
    AlreadyPresent { evidence: String },
    /// No indexer had a wanted release at any resolution.
    NotFound,
}

/// Summary of a download run.
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// `(episode, release)` pairs submitted.
    pub submitted: Vec<(String, String)>,
    pub already_present: Vec<String>,
    pub not_found: Vec<String>,
    /// `(show, error)` pairs for shows whose processing was aborted.
    pub failed: Vec<(String, String)>,
}

impl DownloadReport {
    fn record(&mut self, wanted: &WantedEpisode, outcome: EpisodeOutcome) {
        let episode = wanted.to_string();
        match outcome {
            EpisodeOutcome::Submitted { release, .. } => self.submitted.push((episode, release)),
            EpisodeOutcome::AlreadyPresent { .. } => self.already_present.push(episode),
            EpisodeOutcome::NotFound => self.not_found.push(episode),
        }
    }
}

/// Acquisition loop over injected collaborators.
pub struct Downloader {
    config: DownloaderConfig,
    reconciler: Reconciler,
    history: Box<dyn WatchHistory>,
    /// In priority order.
    indexers: Vec<Box<dyn ReleaseIndexer>>,
    client: Box<dyn DownloadClient>,
}

impl Downloader {
    pub fn new(
        config: DownloaderConfig,
        reconciler: Reconciler,
        history: Box<dyn WatchHistory>,
        indexers: Vec<Box<dyn ReleaseIndexer>>,
        client: Box<dyn DownloadClient>,
    ) -> Self {
        Self {
            config,
            reconciler,
            history,
            indexers,
            client,
        }
    }

    /// Run over the whole collection.
    ///
    /// Failing to list the collection or to scan the local folders aborts
    /// the run; anything that goes wrong for one show is recorded and the
    /// next show is processed.
    pub async fn run(&self) -> Result<DownloadReport> {
        tracing::info!("Starting download run");
        let shows = self.history.collection().await?;
        tracing::info!("{} shows in collection", shows.len());

        let local = self.local_candidates()?;
        let mut report = DownloadReport::default();

        let pb = ProgressBar::new(shows.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        for show in &shows {
            pb.set_message(show.title.clone());
            if let Err(e) = self.process_show(show, &local, &mut report).await {
                tracing::warn!("Skipping {}: {}", show.title, e);
                report.failed.push((show.title.clone(), e.to_string()));
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        tracing::info!(
            "Download run complete: {} submitted, {} present, {} not found, {} failed",
            report.submitted.len(),
            report.already_present.len(),
            report.not_found.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Library filenames followed by unorganized folder and file names.
    pub fn local_candidates(&self) -> Result<Vec<Candidate>> {
        let mut candidates = library_candidates(&self.config.library)?;
        candidates.extend(scan_unorganized(&self.config.unorganized)?.candidates());
        Ok(candidates)
    }

    async fn process_show(
        &self,
        show: &ShowRef,
        local: &[Candidate],
        report: &mut DownloadReport,
    ) -> Result<()> {
        let wanted = self.history.next_episodes(show).await?;
        if wanted.is_empty() {
            tracing::debug!("Nothing new for {}", show.title);
        }
        for episode in &wanted {
            let outcome = self.process_episode(episode, local).await?;
            report.record(episode, outcome);
        }
        Ok(())
    }

    /// Decide and act on one wanted episode.
    pub async fn process_episode(
        &self,
        wanted: &WantedEpisode,
        local: &[Candidate],
    ) -> Result<EpisodeOutcome> {
        if let Some(evidence) = self.queued(wanted).await? {
            tracing::info!("{} already downloading: {}", wanted, evidence);
            return Ok(EpisodeOutcome::AlreadyPresent { evidence });
        }
        if let Some(existing) = self.reconciler.find_existing_file(wanted, local) {
            tracing::info!("{} already present ({}): {}", wanted, existing.source, existing.raw_name);
            return Ok(EpisodeOutcome::AlreadyPresent {
                evidence: existing.raw_name.clone(),
            });
        }

        let show_query = self.reconciler.normalize(&wanted.show.title);
        for resolution in &self.config.resolutions {
            let query = format!("{} {} {}", show_query, wanted.key, resolution);
            if let Some(outcome) = self.try_query(wanted, &query).await? {
                return Ok(outcome);
            }
        }

        tracing::info!("No release found for {}", wanted);
        Ok(EpisodeOutcome::NotFound)
    }

    /// Search all indexers at once, then walk the hits in priority order.
    async fn try_query(&self, wanted: &WantedEpisode, query: &str) -> Result<Option<EpisodeOutcome>> {
        tracing::debug!("Searching: {}", query);
        let results = join_all(self.indexers.iter().map(|indexer| indexer.search(query))).await;

        for (indexer, result) in self.indexers.iter().zip(results) {
            let releases = match result {
                Ok(releases) => releases,
                Err(e) => {
                    tracing::warn!("Search on {} failed: {}", indexer.name(), e);
                    continue;
                }
            };

            let wanted_releases = releases
                .iter()
                .filter(|r| self.reconciler.is_wanted_release(&Candidate::release(r.title.clone()), wanted));
            for release in wanted_releases {
                tracing::info!("Found {} on {}", release.title, indexer.name());
                if let Some(outcome) = self.submit(wanted, &**indexer, release).await? {
                    return Ok(Some(outcome));
                }
            }
        }
        Ok(None)
    }

    /// Check the queue once more, then fetch and submit.
    ///
    /// `Ok(None)` means this release did not work out and the next one may
    /// be tried. The queue check is the one that guarantees a single
    /// submission per episode; a failure to reach the client aborts.
    async fn submit(
        &self,
        wanted: &WantedEpisode,
        indexer: &dyn ReleaseIndexer,
        release: &Release,
    ) -> Result<Option<EpisodeOutcome>> {
        if let Some(evidence) = self.queued(wanted).await? {
            tracing::info!("{} was queued meanwhile: {}", wanted, evidence);
            return Ok(Some(EpisodeOutcome::AlreadyPresent { evidence }));
        }

        let submitted = EpisodeOutcome::Submitted {
            release: release.title.clone(),
            indexer: indexer.name().to_string(),
        };
        if self.config.dry_run {
            tracing::info!("Would submit {} for {}", release.title, wanted);
            return Ok(Some(submitted));
        }

        let payload = match indexer.fetch(release).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Fetching {} from {} failed: {}", release.title, indexer.name(), e);
                return Ok(None);
            }
        };

        match self.client.submit(&format!("{}.nzb", release.title), &payload).await {
            Ok(true) => {
                tracing::info!("Submitted {} for {}", release.title, wanted);
                Ok(Some(submitted))
            }
            Ok(false) => {
                tracing::warn!("Download client refused {}", release.title);
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Submitting {} failed: {}", release.title, e);
                Ok(None)
            }
        }
    }

    /// Name of a live queue entry providing the episode, if any.
    async fn queued(&self, wanted: &WantedEpisode) -> Result<Option<String>> {
        let active: Vec<Candidate> = self
            .client
            .active_downloads()
            .await?
            .into_iter()
            .filter(|d| d.is_live())
            .map(|d| Candidate::release(d.name))
            .collect();
        Ok(self
            .reconciler
            .find_existing_file(wanted, &active)
            .map(|c| c.raw_name.clone()))
    }
}
