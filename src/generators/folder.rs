//! Folder name generator.

use crate::models::media::ShowRef;

/// Generate the show folder name.
///
/// Format: `${title}` or `${title} (${year})` when the year is known.
pub fn generate_show_folder(title: &str, year: Option<u16>) -> String {
    let title = sanitize_filename(title);
    match year {
        Some(year) => format!("{} ({})", title, year),
        None => title,
    }
}

/// Generate the show folder name for a catalog entry.
pub fn generate_catalog_show_folder(show: &ShowRef) -> String {
    generate_show_folder(&show.title, show.year)
}

/// Generate season folder name.
///
/// Format: `Season ${seasonNr2}`
pub fn generate_season_folder(season_number: u16) -> String {
    format!("Season {:02}", season_number)
}

/// Sanitize a string for use in file and folder names.
///
/// Characters that are invalid on common filesystems become spaces, and
/// runs of whitespace collapse to one.
pub fn sanitize_filename(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => ' ',
            _ => c,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
