//! Catalog lookup for a show name.
//!
//! Picks the catalog show whose title best matches a name such as
//! "Doctor Who (2005)". Each entry is scored against both its bare title and
//! "title (year)"; an exact year agreement adds a flat bonus. The highest
//! score wins (first entry on ties) and must clear the acceptance threshold.

use super::normalize::normalize_name;
use super::similarity::Matcher;
use crate::models::config::MatchingConfig;
use crate::models::media::{MatchResult, ShowRef};
use regex::Regex;
use std::sync::LazyLock;

static PAREN_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{4})\)").expect("paren year pattern"));

static PAREN_YEAR_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d{4}\)\s*").expect("paren year strip pattern"));

/// Best-match resolver over a show catalog.
#[derive(Debug, Clone, Copy)]
pub struct BestMatchResolver {
    matcher: Matcher,
    year_bonus: f64,
}

impl BestMatchResolver {
    pub fn new(matcher: Matcher, year_bonus: f64) -> Self {
        Self {
            matcher,
            year_bonus,
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(
            Matcher::new(config.metric, config.accept_threshold),
            config.year_bonus,
        )
    }

    /// Best acceptable catalog entry for `candidate`, if any.
    pub fn resolve_best<'a>(&self, candidate: &str, catalog: &'a [ShowRef]) -> Option<&'a ShowRef> {
        self.best_scored(candidate, catalog)
            .filter(|(_, score)| *score >= self.matcher.threshold())
            .map(|(show, _)| show)
    }

    /// Like [`resolve_best`](Self::resolve_best) but reports the score.
    pub fn resolve(&self, candidate: &str, catalog: &[ShowRef]) -> MatchResult {
        match self.best_scored(candidate, catalog) {
            Some((show, score)) if score >= self.matcher.threshold() => MatchResult {
                matched: true,
                score: score.min(1.0),
                matched_show: Some(show.clone()),
            },
            Some((_, score)) => MatchResult::no_match(score),
            None => MatchResult::no_match(0.0),
        }
    }

    /// Highest scoring entry, bonus included and uncapped.
    fn best_scored<'a>(&self, candidate: &str, catalog: &'a [ShowRef]) -> Option<(&'a ShowRef, f64)> {
        let candidate_year: Option<u16> = PAREN_YEAR
            .captures(candidate)
            .and_then(|caps| caps[1].parse().ok());
        let stripped = PAREN_YEAR_STRIP.replace_all(candidate, "");
        let normalized = normalize_name(&stripped);

        tracing::debug!(
            "Resolving '{}' (normalized '{}', year {:?})",
            candidate,
            normalized,
            candidate_year
        );

        let mut best: Option<(&ShowRef, f64)> = None;
        for show in catalog {
            let title_score = self.matcher.score(&normalized, &normalize_name(&show.title));
            let year_score = show
                .year
                .map(|year| {
                    let with_year = normalize_name(&format!("{} ({})", show.title, year));
                    self.matcher.score(&normalized, &with_year)
                })
                .unwrap_or(0.0);

            let mut score = title_score.max(year_score);
            if candidate_year.is_some() && candidate_year == show.year {
                score += self.year_bonus;
            }

            tracing::trace!(
                "  '{}' ({:?}): title {:.2}, with year {:.2}, final {:.2}",
                show.title,
                show.year,
                title_score,
                year_score,
                score
            );

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((show, score));
            }
        }

        best
    }
}

impl Default for BestMatchResolver {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}
