//! Filename generator.

use super::folder::sanitize_filename;
use crate::models::media::EpisodeKey;

/// Generate the library filename for an episode.
///
/// Format: `${show}.S${seasonNr2}E${episodeNr2}(.${episodeTitle}).${ext}`
///
/// The show part is the show folder name, so a year suffix such as
/// `Foo (2019)` is kept; the parser strips it again when reading.
pub fn generate_episode_filename(
    show_folder: &str,
    key: EpisodeKey,
    episode_title: Option<&str>,
    extension: &str,
) -> String {
    let mut parts = vec![show_folder.to_string(), key.to_string()];
    if let Some(title) = episode_title.map(sanitize_filename).filter(|t| !t.is_empty()) {
        parts.push(title);
    }
    format!("{}.{}", parts.join("."), extension.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::extract_identity;

    fn key(season: u16, episode: u16) -> EpisodeKey {
        EpisodeKey::new(season, episode).unwrap()
    }

    #[test]
    fn test_generate_episode_filename() {
        assert_eq!(
            generate_episode_filename("Foo Bar", key(1, 3), Some("The.Pilot"), "mkv"),
            "Foo Bar.S01E03.The.Pilot.mkv"
        );
        assert_eq!(
            generate_episode_filename("Foo Bar (2019)", key(2, 10), None, "MP4"),
            "Foo Bar (2019).S02E10.mp4"
        );
    }

    #[test]
    fn test_episode_title_is_sanitized() {
        assert_eq!(
            generate_episode_filename("Show", key(1, 1), Some("What: If?"), "mkv"),
            "Show.S01E01.What If.mkv"
        );
        assert_eq!(
            generate_episode_filename("Show", key(1, 1), Some("???"), "mkv"),
            "Show.S01E01.mkv"
        );
    }

    #[test]
    fn test_generated_names_parse_back() {
        let name = generate_episode_filename("Foo Bar (2019)", key(4, 7), Some("Finale"), "mkv");
        let identity = extract_identity(&name).unwrap();
        assert_eq!(identity.show_name_raw, "Foo Bar");
        assert_eq!(identity.key, key(4, 7));
    }
}
