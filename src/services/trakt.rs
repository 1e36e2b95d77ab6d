//! Trakt API client.
//!
//! Provides the show collection, the next unwatched episodes of a show and
//! the OAuth device flow used to obtain an access token.

use super::WatchHistory;
use crate::models::config::TraktConfig;
use crate::models::media::{EpisodeKey, ShowRef, WantedEpisode};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};

const TRAKT_BASE_URL: &str = "https://api.trakt.tv";
const TRAKT_API_VERSION: &str = "2";

/// Episodes fetched ahead of the last watched one.
const NEXT_EPISODE_COUNT: usize = 2;

/// Collection entry.
#[derive(Debug, Deserialize)]
pub struct CollectionItem {
    pub show: TraktShow,
}

/// Show summary.
#[derive(Debug, Deserialize)]
pub struct TraktShow {
    pub title: String,
    pub year: Option<u16>,
    pub ids: TraktIds,
}

/// Show identifiers.
#[derive(Debug, Deserialize)]
pub struct TraktIds {
    pub trakt: Option<u64>,
    pub slug: Option<String>,
    pub imdb: Option<String>,
}

/// History entry.
#[derive(Debug, Deserialize)]
pub struct HistoryItem {
    pub episode: Option<TraktEpisode>,
}

/// Episode summary.
#[derive(Debug, Clone, Deserialize)]
pub struct TraktEpisode {
    pub season: u16,
    pub number: u16,
    pub title: Option<String>,
}

/// Where the watch history leaves a show.
#[derive(Debug, Clone)]
pub enum LastWatched {
    /// Nothing watched yet.
    NoHistory,
    Episode(TraktEpisode),
    /// History exists but its latest entry names no episode.
    Unknown,
}

impl TraktShow {
    /// Convert to a catalog entry; shows without a slug cannot be looked up.
    pub fn into_show_ref(self) -> Option<ShowRef> {
        let slug = self.ids.slug?;
        Some(ShowRef::new(self.title, self.year, slug))
    }
}

/// Trakt API client.
pub struct TraktClient {
    client_id: String,
    access_token: String,
    client: reqwest::Client,
}

impl TraktClient {
    /// Create a client; needs both the client id and an access token.
    pub fn new(config: &TraktConfig, client: reqwest::Client) -> Result<Self> {
        let client_id = config
            .client_id
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::MissingSettings(vec!["trakt.client_id".to_string()]))?;
        let access_token = config
            .access_token
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or(Error::TraktNotAuthorized)?;

        Ok(Self {
            client_id,
            access_token,
            client,
        })
    }

    /// Build a GET request with Trakt headers.
    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{}", TRAKT_BASE_URL, path))
            .header("Content-Type", "application/json")
            .header("trakt-api-version", TRAKT_API_VERSION)
            .header("trakt-api-key", &self.client_id)
            .bearer_auth(&self.access_token)
    }

    /// Verify the access token is accepted.
    pub async fn verify_token(&self) -> Result<bool> {
        match self.get("users/settings").send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Shows in the user's collection.
    pub async fn collection_shows(&self) -> Result<Vec<ShowRef>> {
        let items: Vec<CollectionItem> = self
            .get("users/me/collection/shows")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let shows: Vec<ShowRef> = items
            .into_iter()
            .filter_map(|item| item.show.into_show_ref())
            .collect();
        tracing::info!("Collection holds {} shows", shows.len());
        Ok(shows)
    }

    /// Numeric Trakt id for a slug.
    async fn show_id(&self, slug: &str) -> Result<Option<u64>> {
        let show: TraktShow = self
            .get(&format!("shows/{}", slug))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(show.ids.trakt)
    }

    /// Most recently watched episode of a show.
    pub async fn last_watched(&self, slug: &str) -> Result<LastWatched> {
        let Some(id) = self.show_id(slug).await? else {
            tracing::warn!("Could not fetch show id for slug: {}", slug);
            return Ok(LastWatched::Unknown);
        };
        let history: Vec<HistoryItem> = self
            .get(&format!("sync/history/shows/{}?limit=1&extended=full", id))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(last_watched_from(history))
    }

    /// Look up one episode; `None` when Trakt does not know it.
    pub async fn episode(&self, slug: &str, key: EpisodeKey) -> Result<Option<TraktEpisode>> {
        let resp = self
            .get(&format!(
                "shows/{}/seasons/{}/episodes/{}",
                slug, key.season, key.episode
            ))
            .send()
            .await?;
        if !episode_exists(resp.status()) {
            return Ok(None);
        }
        Ok(Some(resp.json().await?))
    }
}

#[async_trait]
impl WatchHistory for TraktClient {
    async fn collection(&self) -> Result<Vec<ShowRef>> {
        self.collection_shows().await
    }

    async fn next_episodes(&self, show: &ShowRef) -> Result<Vec<WantedEpisode>> {
        let slug = show.external_id.as_str();
        let last = self.last_watched(slug).await?;
        match &last {
            LastWatched::Episode(ep) => tracing::debug!(
                "{}: last watched S{:02}E{:02} {}",
                show.title,
                ep.season,
                ep.number,
                ep.title.as_deref().unwrap_or("")
            ),
            LastWatched::NoHistory => tracing::debug!("{}: no watch history", show.title),
            LastWatched::Unknown => {
                tracing::warn!("{}: could not determine the last watched episode", show.title)
            }
        }

        let found = plan_next_episodes(&last, |key| self.episode(slug, key)).await?;
        Ok(found
            .into_iter()
            .map(|(key, title)| WantedEpisode {
                show: show.clone(),
                key,
                title,
            })
            .collect())
    }
}

/// Latest history entry; an entry without an episode is `Unknown`.
pub fn last_watched_from(history: Vec<HistoryItem>) -> LastWatched {
    match history.into_iter().next() {
        None => LastWatched::NoHistory,
        Some(HistoryItem { episode: Some(ep) }) => LastWatched::Episode(ep),
        Some(HistoryItem { episode: None }) => LastWatched::Unknown,
    }
}

/// Whether an episode lookup response carries the episode.
///
/// 404 is the normal answer past the last episode; any other failure is
/// logged and treated the same way so the rest of the show still runs.
pub fn episode_exists(status: StatusCode) -> bool {
    if status.is_success() {
        return true;
    }
    if status != StatusCode::NOT_FOUND {
        tracing::warn!("Episode lookup returned {}, treating as missing", status);
    }
    false
}

/// Walk forward from the last watched episode.
///
/// Without history the first existing episodes among S01E01, S01E02, S02E01
/// and S02E02 are returned. Otherwise the episode number is stepped; when an
/// episode is missing the walk rolls over to episode 1 of the next season.
/// An unknown position yields nothing. `lookup` returns `None` for episodes
/// that do not exist.
pub async fn plan_next_episodes<F, Fut>(
    last: &LastWatched,
    mut lookup: F,
) -> Result<Vec<(EpisodeKey, Option<String>)>>
where
    F: FnMut(EpisodeKey) -> Fut,
    Fut: Future<Output = Result<Option<TraktEpisode>>>,
{
    let mut found = Vec::new();

    let last = match last {
        LastWatched::Episode(ep) => ep,
        LastWatched::Unknown => return Ok(found),
        LastWatched::NoHistory => {
            'seasons: for season in 1..=2 {
                for episode in 1..=2 {
                    let key = EpisodeKey { season, episode };
                    if let Some(ep) = lookup(key).await? {
                        found.push((key, ep.title));
                    }
                    if found.len() == NEXT_EPISODE_COUNT {
                        break 'seasons;
                    }
                }
            }
            return Ok(found);
        }
    };

    if last.season == 0 || last.number == 0 {
        tracing::debug!("Last watched episode has no regular season/number");
        return Ok(found);
    }

    let (mut season, mut episode) = (last.season, last.number);
    for _ in 0..NEXT_EPISODE_COUNT {
        episode += 1;
        let mut result = lookup(EpisodeKey { season, episode }).await?;
        if result.is_none() {
            season += 1;
            episode = 1;
            result = lookup(EpisodeKey { season, episode }).await?;
        }
        if let Some(ep) = result {
            found.push((EpisodeKey { season, episode }, ep.title));
        }
    }

    Ok(found)
}

// ========== DEVICE FLOW ==========

/// Device code issued by Trakt.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCode {
    pub device_code: String,
    pub user_code: String,
    pub verification_url: String,
    /// Seconds until the code expires.
    pub expires_in: u64,
    /// Seconds between polls.
    pub interval: u64,
}

/// Access token response.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub created_at: Option<i64>,
}

#[derive(Serialize)]
struct DeviceCodeRequest<'a> {
    client_id: &'a str,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// What one token poll means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Ready,
    Pending,
    SlowDown,
}

/// Interpret a token poll status code.
pub fn poll_outcome(status: StatusCode) -> Result<PollOutcome> {
    match status.as_u16() {
        200 => Ok(PollOutcome::Ready),
        400 => Ok(PollOutcome::Pending),
        429 => Ok(PollOutcome::SlowDown),
        404 => Err(Error::TraktAuth("invalid device code".to_string())),
        409 => Err(Error::TraktAuth("device code already used".to_string())),
        410 => Err(Error::DeviceCodeExpired),
        418 => Err(Error::TraktAuth("authorization denied by user".to_string())),
        other => Err(Error::TraktAuth(format!("unexpected status {}", other))),
    }
}

/// Trakt OAuth device-flow authorizer.
pub struct TraktAuthorizer {
    client_id: String,
    client_secret: String,
    client: reqwest::Client,
}

impl TraktAuthorizer {
    pub fn new(config: &TraktConfig, client: reqwest::Client) -> Result<Self> {
        let mut missing = Vec::new();
        if config.client_id.as_deref().unwrap_or("").is_empty() {
            missing.push("trakt.client_id".to_string());
        }
        if config.client_secret.as_deref().unwrap_or("").is_empty() {
            missing.push("trakt.client_secret".to_string());
        }
        if !missing.is_empty() {
            return Err(Error::MissingSettings(missing));
        }

        Ok(Self {
            client_id: config.client_id.clone().unwrap_or_default(),
            client_secret: config.client_secret.clone().unwrap_or_default(),
            client,
        })
    }

    /// Step 1: request a device code and user code.
    pub async fn request_device_code(&self) -> Result<DeviceCode> {
        let resp = self
            .client
            .post(format!("{}/oauth/device/code", TRAKT_BASE_URL))
            .header("trakt-api-key", &self.client_id)
            .json(&DeviceCodeRequest {
                client_id: &self.client_id,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::TraktAuth(format!("{} - {}", status, body)));
        }
        Ok(resp.json().await?)
    }

    /// Step 2: poll until the user approves, the code expires or Trakt
    /// refuses.
    pub async fn poll_for_token(&self, code: &DeviceCode) -> Result<AccessToken> {
        let deadline = Instant::now() + Duration::from_secs(code.expires_in);
        let interval = Duration::from_secs(code.interval.max(1));
        let request = TokenRequest {
            code: &code.device_code,
            client_id: &self.client_id,
            client_secret: &self.client_secret,
        };

        while Instant::now() < deadline {
            let resp = self
                .client
                .post(format!("{}/oauth/device/token", TRAKT_BASE_URL))
                .json(&request)
                .send()
                .await?;

            match poll_outcome(resp.status())? {
                PollOutcome::Ready => return Ok(resp.json().await?),
                PollOutcome::Pending => {
                    tracing::info!("Authorization pending. Approve the code in your browser...");
                }
                PollOutcome::SlowDown => {
                    tracing::warn!("Polling too frequently, backing off");
                    tokio::time::sleep(interval).await;
                }
            }

            tokio::time::sleep(interval).await;
        }

        Err(Error::DeviceCodeExpired)
    }
}
