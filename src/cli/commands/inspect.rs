//! Inspect command implementation.
//!
//! Shows every step of matching one name, for debugging mismatches.

use crate::core::parser::parse_release;
use crate::core::Reconciler;
use crate::models::config::Config;
use crate::models::media::{Candidate, EpisodeKey, ShowRef, WantedEpisode};
use crate::Result;
use colored::Colorize;

/// What to compare the name against.
#[derive(Debug, Default)]
pub struct InspectTarget {
    pub show: Option<String>,
    pub season: Option<u16>,
    pub episode: Option<u16>,
    pub year: Option<u16>,
}

/// Print normalization, extraction and match verdicts for `name`.
pub fn inspect(config: &Config, name: &str, target: &InspectTarget) -> Result<()> {
    let reconciler = Reconciler::new(&config.matching);

    println!("{} {}", "Name:".bold(), name);
    println!("{} {}", "Normalized:".bold(), reconciler.normalize(name));

    let parsed = parse_release(name);
    match &parsed {
        Some(release) => {
            println!(
                "{} {} {}",
                "Identity:".bold(),
                release.identity.show_name_raw,
                release.identity.key
            );
            if let Some(ref title) = release.episode_title {
                println!("{} {}", "Episode title:".bold(), title);
            }
        }
        None => println!("{} {}", "Identity:".bold(), "none".yellow()),
    }

    let Some(show_title) = target.show.as_deref() else {
        return Ok(());
    };
    println!();

    let show_name = parsed
        .as_ref()
        .map(|r| r.identity.show_name_raw.clone())
        .unwrap_or_else(|| name.to_string());
    let similarity = reconciler.similar(
        &reconciler.normalize(&show_name),
        &reconciler.normalize(show_title),
    );
    println!(
        "{} {:.3} vs '{}' -> {}",
        "Similarity:".bold(),
        similarity.score,
        show_title,
        verdict(similarity.is_match)
    );

    let show = ShowRef::new(show_title, target.year, "");
    let catalog_name = match parsed.as_ref().and_then(|r| r.year) {
        Some(year) => format!("{} ({})", show_name, year),
        None => show_name.clone(),
    };
    let resolved = reconciler.resolver().resolve(&catalog_name, std::slice::from_ref(&show));
    println!(
        "{} {:.3} -> {}",
        "Catalog score:".bold(),
        resolved.score,
        verdict(resolved.matched)
    );

    if let (Some(season), Some(episode)) = (target.season, target.episode) {
        let Some(key) = EpisodeKey::new(season, episode) else {
            println!("{} {}", "Wanted:".bold(), "season and episode must be at least 1".red());
            return Ok(());
        };
        let wanted = WantedEpisode::new(show, key);
        let candidate = Candidate::release(name);
        println!(
            "{} {} -> {}",
            "Wanted release:".bold(),
            wanted,
            verdict(reconciler.is_wanted_release(&candidate, &wanted))
        );
    }

    Ok(())
}

fn verdict(matched: bool) -> colored::ColoredString {
    if matched {
        "match".green()
    } else {
        "no match".red()
    }
}
