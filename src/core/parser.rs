//! Release name parser.
//!
//! Pulls the show name and `SxxEyy` episode key out of release titles,
//! download folder names and library filenames:
//! - Quality/source tags (`1080p`, `WEB-DL`, ...) and everything after them
//!   are dropped
//! - The show name is the text before the first `.SxxEyy` / ` SxxEyy` marker
//! - A trailing `(1999)` or `.1999` year is removed from the show name

use crate::models::media::{EpisodeKey, ParsedIdentity};
use crate::utils::fs::VIDEO_EXTENSIONS;
use regex::Regex;
use std::sync::LazyLock;

static QUALITY_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[.\s](?:1080p|2160p|720p|HDTV|WEB-DL|BluRay|WEBRip|BRRip).*$")
        .expect("quality tail pattern")
});

static EPISODE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(.+?)[.\s]S(\d{2})E(\d{2})").expect("episode marker pattern")
});

static YEAR_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s*\((\d{4})\)|\.(\d{4}))\s*$").expect("year suffix pattern")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// A parsed release name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseName {
    pub identity: ParsedIdentity,
    /// Year removed from the end of the show name.
    pub year: Option<u16>,
    /// Text between the episode marker and the quality tags, if any
    /// (usually the episode title).
    pub episode_title: Option<String>,
}

/// Extract show name and episode key from a raw name.
///
/// Returns `None` when no `SxxEyy` marker follows the show name, or when the
/// marker carries a zero season or episode.
pub fn extract_identity(raw: &str) -> Option<ParsedIdentity> {
    parse_release(raw).map(|r| r.identity)
}

/// Parse a raw name, keeping the trailing episode title.
pub fn parse_release(raw: &str) -> Option<ReleaseName> {
    let without_ext = strip_video_extension(raw);
    let clean = match QUALITY_TAIL.find(without_ext) {
        Some(m) => &without_ext[..m.start()],
        None => without_ext,
    };

    let caps = EPISODE_MARKER.captures(clean)?;
    let season: u16 = caps[2].parse().ok()?;
    let episode: u16 = caps[3].parse().ok()?;
    let key = EpisodeKey::new(season, episode)?;

    let (show_name_raw, year) = clean_show_name(&caps[1]);
    if show_name_raw.is_empty() {
        return None;
    }

    let marker_end = caps.get(0).map(|m| m.end()).unwrap_or(clean.len());
    let episode_title = clean[marker_end..]
        .trim_matches(|c: char| c == '.' || c == '-' || c == '_' || c.is_whitespace())
        .to_string();

    Some(ReleaseName {
        identity: ParsedIdentity { show_name_raw, key },
        year,
        episode_title: (!episode_title.is_empty()).then_some(episode_title),
    })
}

fn clean_show_name(segment: &str) -> (String, Option<u16>) {
    let year = YEAR_SUFFIX
        .captures(segment)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .and_then(|m| m.as_str().parse().ok());
    let without_year = YEAR_SUFFIX.replace(segment, "");
    let spaced = without_year.replace('.', " ");
    (WHITESPACE_RUN.replace_all(&spaced, " ").trim().to_string(), year)
}

fn strip_video_extension(raw: &str) -> &str {
    match raw.rsplit_once('.') {
        Some((stem, ext)) if VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()) => stem,
        _ => raw,
    }
}
