//! External service clients.
//!
//! The acquisition loop talks to its collaborators through the traits
//! below; the concrete clients are Trakt, Newznab indexers and NZBGet.

pub mod newznab;
pub mod nzbget;
pub mod trakt;

use crate::models::media::{ShowRef, WantedEpisode};
use crate::models::release::{ActiveDownload, Release};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Watch-history and catalog source.
#[async_trait]
pub trait WatchHistory: Send + Sync {
    /// Shows the user tracks.
    async fn collection(&self) -> Result<Vec<ShowRef>>;

    /// Next unwatched episodes of `show`.
    async fn next_episodes(&self, show: &ShowRef) -> Result<Vec<WantedEpisode>>;
}

/// A release search service.
#[async_trait]
pub trait ReleaseIndexer: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str) -> Result<Vec<Release>>;

    /// Download the release payload (NZB file contents).
    async fn fetch(&self, release: &Release) -> Result<Vec<u8>>;
}

/// The download client receiving payloads.
#[async_trait]
pub trait DownloadClient: Send + Sync {
    /// Groups currently queued, downloading or post-processing.
    async fn active_downloads(&self) -> Result<Vec<ActiveDownload>>;

    /// Submit a payload; `Ok(false)` means the client refused it.
    async fn submit(&self, name: &str, payload: &[u8]) -> Result<bool>;
}

/// Build the shared HTTP client.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("showfetch/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
