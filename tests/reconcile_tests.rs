//! Integration tests for the matching core.

use showfetch::core::{extract_identity, normalize_name, similar, Reconciler};
use showfetch::models::media::{Candidate, EpisodeKey, ShowRef, WantedEpisode};

fn wanted(title: &str, season: u16, episode: u16) -> WantedEpisode {
    WantedEpisode::new(
        ShowRef::new(title, None, ""),
        EpisodeKey::new(season, episode).unwrap(),
    )
}

#[test]
fn test_normalize_is_idempotent() {
    for raw in ["Café Society", "Marvel's Agents of S.H.I.E.L.D.", "24: Live Another Day", "9-1-1", ""] {
        let once = normalize_name(raw);
        assert_eq!(normalize_name(&once), once, "not idempotent for {:?}", raw);
    }
}

#[test]
fn test_normalize_ignores_case_and_accents() {
    assert_eq!(normalize_name("Café"), normalize_name("CAFE"));
}

#[test]
fn test_extract_release_name() {
    let identity = extract_identity("Show.Name.S01E02.720p.WEB-DL.mkv").unwrap();
    assert_eq!(identity.show_name_raw, "Show Name");
    assert_eq!(identity.key, EpisodeKey::new(1, 2).unwrap());

    assert!(extract_identity("NoPatternHere.mkv").is_none());
}

#[test]
fn test_similarity_verdicts() {
    let same = similar(&normalize_name("The Office"), &normalize_name("the office"));
    assert!(same.is_match);
    assert_eq!(same.score, 1.0);

    let different = similar(&normalize_name("The Office"), &normalize_name("Breaking Bad"));
    assert!(!different.is_match);
    assert!(different.score < 0.80);
}

#[test]
fn test_year_bonus_breaks_tie() {
    let reconciler = Reconciler::default();
    let catalog = vec![
        ShowRef::new("Show", Some(1999), "show-1999"),
        ShowRef::new("Show", Some(2005), "show-2005"),
    ];
    let best = reconciler.resolve_best("Show (2005)", &catalog).unwrap();
    assert_eq!(best.external_id, "show-2005");
}

#[test]
fn test_episode_key_is_a_hard_filter() {
    let reconciler = Reconciler::default();
    let episode = wanted("Foo Bar", 1, 3);
    assert!(!reconciler.is_wanted_release(&Candidate::release("Foo.Bar.S01E04.1080p"), &episode));
    assert!(!reconciler.is_wanted_release(&Candidate::release("Foo.Bar.S02E03.1080p"), &episode));
    assert!(reconciler.is_wanted_release(&Candidate::release("Foo.Bar.S01E03.1080p"), &episode));
}

#[test]
fn test_find_existing_file_is_first_match() {
    let reconciler = Reconciler::default();
    let episode = wanted("Foo Bar", 1, 3);
    let entries = vec![
        Candidate::file("Foo Barr.S01E03.mkv"),
        Candidate::file("Foo.Bar.S01E03.mkv"),
    ];
    let found = reconciler.find_existing_file(&episode, &entries).unwrap();
    assert_eq!(found.raw_name, "Foo Barr.S01E03.mkv");
}

#[test]
fn test_end_to_end_release_selection() {
    let reconciler = Reconciler::default();
    let episode = wanted("Foo Bar", 1, 3);
    let candidates = [
        "Foo.Bar.S01E03.1080p.mkv",
        "Unrelated.S01E03.mkv",
        "Foo.Bar.S01E04.mkv",
    ];
    let accepted: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|name| reconciler.is_wanted_release(&Candidate::release(*name), &episode))
        .collect();
    assert_eq!(accepted, vec!["Foo.Bar.S01E03.1080p.mkv"]);
}
