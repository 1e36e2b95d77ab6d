//! Episode identity reconciliation.
//!
//! Answers the two questions the acquisition loop asks:
//! - does this release refer to the wanted episode?
//! - which existing file (if any) already provides it?
//!
//! Season and episode numbers are a hard filter; only show names are
//! compared fuzzily.

use super::normalize::normalize_name;
use super::parser::extract_identity;
use super::resolver::BestMatchResolver;
use super::similarity::{Matcher, Similarity};
use crate::models::config::MatchingConfig;
use crate::models::media::{Candidate, ParsedIdentity, ShowRef, WantedEpisode};

/// Stateless matching engine configured once from [`MatchingConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    matcher: Matcher,
    resolver: BestMatchResolver,
}

impl Reconciler {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            matcher: Matcher::new(config.metric, config.accept_threshold),
            resolver: BestMatchResolver::from_config(config),
        }
    }

    pub fn normalize(&self, raw: &str) -> String {
        normalize_name(raw)
    }

    pub fn extract(&self, raw: &str) -> Option<ParsedIdentity> {
        extract_identity(raw)
    }

    /// Compare two already normalized names.
    pub fn similar(&self, a: &str, b: &str) -> Similarity {
        self.matcher.similar(a, b)
    }

    pub fn resolve_best<'a>(&self, candidate: &str, catalog: &'a [ShowRef]) -> Option<&'a ShowRef> {
        self.resolver.resolve_best(candidate, catalog)
    }

    pub fn resolver(&self) -> &BestMatchResolver {
        &self.resolver
    }

    /// Whether `candidate` names exactly the wanted episode of a similar show.
    pub fn is_wanted_release(&self, candidate: &Candidate, wanted: &WantedEpisode) -> bool {
        let Some(identity) = extract_identity(&candidate.raw_name) else {
            tracing::trace!("No episode marker in '{}'", candidate.raw_name);
            return false;
        };
        if identity.key != wanted.key {
            return false;
        }
        self.names_match(&identity.show_name_raw, &normalize_name(&wanted.show.title))
    }

    /// First entry, in input order, that provides the wanted episode.
    ///
    /// This is deliberately first-match rather than best-match: any
    /// sufficiently similar hit means the episode is already present.
    pub fn find_existing_file<'a>(
        &self,
        wanted: &WantedEpisode,
        entries: &'a [Candidate],
    ) -> Option<&'a Candidate> {
        let wanted_name = normalize_name(&wanted.show.title);
        entries.iter().find(|entry| {
            extract_identity(&entry.raw_name).is_some_and(|identity| {
                identity.key == wanted.key && self.names_match(&identity.show_name_raw, &wanted_name)
            })
        })
    }

    fn names_match(&self, show_name_raw: &str, wanted_normalized: &str) -> bool {
        let result = self.matcher.similar(&normalize_name(show_name_raw), wanted_normalized);
        tracing::trace!(
            "'{}' vs '{}': {:.2} ({})",
            show_name_raw,
            wanted_normalized,
            result.score,
            if result.is_match { "match" } else { "no match" }
        );
        result.is_match
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(&MatchingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::EpisodeKey;

    fn wanted(title: &str, season: u16, episode: u16) -> WantedEpisode {
        WantedEpisode::new(
            ShowRef::new(title, None, "slug"),
            EpisodeKey::new(season, episode).unwrap(),
        )
    }

    #[test]
    fn test_end_to_end_release_selection() {
        let engine = Reconciler::default();
        let wanted = wanted("Foo Bar", 1, 3);
        let candidates = [
            Candidate::release("Foo.Bar.S01E03.1080p.mkv"),
            Candidate::release("Unrelated.S01E03.mkv"),
            Candidate::release("Foo.Bar.S01E04.mkv"),
        ];

        let accepted: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| engine.is_wanted_release(c, &wanted))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(accepted, vec![0]);
    }

    #[test]
    fn test_key_is_a_hard_filter() {
        let engine = Reconciler::default();
        let wanted = wanted("Foo Bar", 1, 3);
        assert!(!engine.is_wanted_release(&Candidate::release("Foo.Bar.S01E04.mkv"), &wanted));
        assert!(!engine.is_wanted_release(&Candidate::release("Foo.Bar.S02E03.mkv"), &wanted));
        assert!(!engine.is_wanted_release(&Candidate::release("Foo.Bar.S1E3.mkv"), &wanted));
    }

    #[test]
    fn test_unparseable_release_rejected() {
        let engine = Reconciler::default();
        assert!(!engine.is_wanted_release(&Candidate::release("Foo Bar complete series"), &wanted("Foo Bar", 1, 3)));
    }

    #[test]
    fn test_release_with_year_and_accents() {
        let engine = Reconciler::default();
        let wanted = wanted("Pokémon", 2, 11);
        assert!(engine.is_wanted_release(&Candidate::release("Pokemon.2019.S02E11.720p.HDTV"), &wanted));
    }

    #[test]
    fn test_find_existing_file_is_first_match() {
        let engine = Reconciler::default();
        let wanted = wanted("Foo Bar", 1, 3);
        let entries = [
            Candidate::file("Notes.txt"),
            Candidate::file("Foo.Barr.S01E03.mkv"),
            Candidate::file("Foo.Bar.S01E03.mkv"),
        ];

        let first = engine.find_existing_file(&wanted, &entries).unwrap();
        assert_eq!(first.raw_name, "Foo.Barr.S01E03.mkv");
    }

    #[test]
    fn test_find_existing_file_skips_wrong_keys_and_names() {
        let engine = Reconciler::default();
        let wanted = wanted("Foo Bar", 1, 3);
        let entries = [
            Candidate::folder("Foo.Bar.S01E02.1080p.WEB-DL-GRP"),
            Candidate::folder("Something.Else.S01E03.1080p"),
        ];
        assert!(engine.find_existing_file(&wanted, &entries).is_none());

        let with_hit = [entries[0].clone(), entries[1].clone(), Candidate::folder("Foo.Bar.S01E03.720p.HDTV-GRP")];
        assert_eq!(
            engine.find_existing_file(&wanted, &with_hit).map(|c| c.raw_name.as_str()),
            Some("Foo.Bar.S01E03.720p.HDTV-GRP")
        );
    }

    #[test]
    fn test_find_existing_file_empty() {
        let engine = Reconciler::default();
        assert!(engine.find_existing_file(&wanted("Foo Bar", 1, 3), &[]).is_none());
    }

    #[test]
    fn test_stricter_threshold_rejects_near_names() {
        let config = MatchingConfig {
            accept_threshold: 0.95,
            ..MatchingConfig::default()
        };
        let engine = Reconciler::new(&config);
        let wanted = wanted("Foo Bar", 1, 3);
        assert!(!engine.is_wanted_release(&Candidate::release("Foo.Barr.S01E03"), &wanted));
        assert!(engine.is_wanted_release(&Candidate::release("Foo.Bar.S01E03"), &wanted));
    }
}
