//! Show and episode identity models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tracked show from the watch-history catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRef {
    /// Display title.
    pub title: String,
    /// First air year.
    pub year: Option<u16>,
    /// Catalog identifier (Trakt slug).
    pub external_id: String,
}

impl ShowRef {
    pub fn new<T: Into<String>, I: Into<String>>(title: T, year: Option<u16>, external_id: I) -> Self {
        Self {
            title: title.into(),
            year,
            external_id: external_id.into(),
        }
    }
}

/// Season/episode pair. Compared by exact equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawEpisodeKey")]
pub struct EpisodeKey {
    pub season: u16,
    pub episode: u16,
}

impl EpisodeKey {
    /// Build a key, rejecting zero season or episode numbers.
    pub fn new(season: u16, episode: u16) -> Option<Self> {
        if season == 0 || episode == 0 {
            return None;
        }
        Some(Self { season, episode })
    }
}

#[derive(Deserialize)]
struct RawEpisodeKey {
    season: u16,
    episode: u16,
}

impl TryFrom<RawEpisodeKey> for EpisodeKey {
    type Error = String;

    fn try_from(raw: RawEpisodeKey) -> Result<Self, Self::Error> {
        EpisodeKey::new(raw.season, raw.episode).ok_or_else(|| {
            format!(
                "season and episode must be at least 1, got S{:02}E{:02}",
                raw.season, raw.episode
            )
        })
    }
}

impl fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02}", self.season, self.episode)
    }
}

/// An episode the acquisition loop should try to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WantedEpisode {
    pub show: ShowRef,
    pub key: EpisodeKey,
    /// Episode title as reported by the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl WantedEpisode {
    pub fn new(show: ShowRef, key: EpisodeKey) -> Self {
        Self {
            show,
            key,
            title: None,
        }
    }
}

impl fmt::Display for WantedEpisode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.show.title, self.key)
    }
}

/// Where a candidate name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    ReleaseTitle,
    Filename,
    FolderName,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSource::ReleaseTitle => write!(f, "release"),
            CandidateSource::Filename => write!(f, "file"),
            CandidateSource::FolderName => write!(f, "folder"),
        }
    }
}

/// A raw name being evaluated for episode identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub raw_name: String,
    pub source: CandidateSource,
}

impl Candidate {
    pub fn new<S: Into<String>>(raw_name: S, source: CandidateSource) -> Self {
        Self {
            raw_name: raw_name.into(),
            source,
        }
    }

    pub fn release<S: Into<String>>(raw_name: S) -> Self {
        Self::new(raw_name, CandidateSource::ReleaseTitle)
    }

    pub fn file<S: Into<String>>(raw_name: S) -> Self {
        Self::new(raw_name, CandidateSource::Filename)
    }

    pub fn folder<S: Into<String>>(raw_name: S) -> Self {
        Self::new(raw_name, CandidateSource::FolderName)
    }
}

/// Show name and episode key pulled out of a raw name.
///
/// `show_name_raw` is cleaned of separators and year suffixes but not yet
/// normalized for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentity {
    pub show_name_raw: String,
    pub key: EpisodeKey,
}

/// Outcome of resolving a name against a show catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub matched: bool,
    /// Best score seen, clamped to `[0, 1]`.
    pub score: f64,
    pub matched_show: Option<ShowRef>,
}

impl MatchResult {
    pub fn no_match(score: f64) -> Self {
        Self {
            matched: false,
            score: score.clamp(0.0, 1.0),
            matched_show: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_key_rejects_zero() {
        assert!(EpisodeKey::new(0, 1).is_none());
        assert!(EpisodeKey::new(1, 0).is_none());
        assert_eq!(
            EpisodeKey::new(1, 2),
            Some(EpisodeKey {
                season: 1,
                episode: 2
            })
        );
    }

    #[test]
    fn test_episode_key_deserialize_rejects_zero() {
        let key: EpisodeKey = serde_json::from_str(r#"{"season": 2, "episode": 5}"#).unwrap();
        assert_eq!(key, EpisodeKey::new(2, 5).unwrap());
        assert!(serde_json::from_str::<EpisodeKey>(r#"{"season": 0, "episode": 5}"#).is_err());

        let wanted = r#"{"show": {"title": "Foo", "year": null, "external_id": "foo"},
                         "key": {"season": 1, "episode": 0}}"#;
        assert!(serde_json::from_str::<WantedEpisode>(wanted).is_err());
    }

    #[test]
    fn test_episode_key_display() {
        let key = EpisodeKey::new(3, 12).unwrap();
        assert_eq!(key.to_string(), "S03E12");
    }

    #[test]
    fn test_wanted_episode_display() {
        let show = ShowRef::new("Foo Bar", Some(2019), "foo-bar");
        let wanted = WantedEpisode::new(show, EpisodeKey::new(1, 3).unwrap());
        assert_eq!(wanted.to_string(), "Foo Bar S01E03");
    }
}
