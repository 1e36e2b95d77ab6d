//! Title normalization.
//!
//! Turns a free-form title into a lowercase, space-separated, alphanumeric
//! form that can be compared with a similarity metric. Accents fold to their
//! base letters and letter/digit runs are split ("Show2" -> "show 2").

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a title for comparison.
///
/// The result is stable under repeated application.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev: Option<char> = None;

    for c in raw.nfkd() {
        let c = if c == '/' { ' ' } else { c };
        if is_combining_mark(c) || !(c.is_alphanumeric() || c.is_whitespace()) {
            continue;
        }
        for lower in c.to_lowercase() {
            if is_combining_mark(lower) {
                continue;
            }
            if let Some(p) = prev {
                if is_letter_digit_boundary(p, lower) {
                    out.push(' ');
                }
            }
            out.push(lower);
            prev = Some(lower);
        }
    }

    let trimmed = out.trim();
    if trimmed.len() == out.len() {
        out
    } else {
        trimmed.to_string()
    }
}

fn is_letter_digit_boundary(prev: char, next: char) -> bool {
    (prev.is_alphabetic() && next.is_numeric()) || (prev.is_numeric() && next.is_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_punctuation() {
        assert_eq!(normalize_name("The Office (US)"), "the office us");
        assert_eq!(normalize_name("  Marvel's Agents of S.H.I.E.L.D.  "), "marvels agents of shield");
    }

    #[test]
    fn test_accents_fold() {
        assert_eq!(normalize_name("Café"), normalize_name("CAFE"));
        assert_eq!(normalize_name("Pokémon"), "pokemon");
    }

    #[test]
    fn test_slash_separates_alternate_titles() {
        assert_eq!(normalize_name("Money Heist/La Casa de Papel"), "money heist la casa de papel");
    }

    #[test]
    fn test_letter_digit_boundaries() {
        assert_eq!(normalize_name("Show2"), "show 2");
        assert_eq!(normalize_name("9-1-1"), "911");
        assert_eq!(normalize_name("24Hours"), "24 hours");
        assert_eq!(normalize_name("Stranger Things 4K"), "stranger things 4 k");
    }

    #[test]
    fn test_boundary_created_by_stripped_punctuation() {
        // The hyphen disappears, so the split must still happen.
        assert_eq!(normalize_name("a-1"), "a 1");
    }

    #[test]
    fn test_compatibility_forms() {
        assert_eq!(normalize_name("Ｆｕｌｌｗｉｄｔｈ"), "fullwidth");
        assert_eq!(normalize_name("Season²"), "season 2");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Café",
            "The.Office.US",
            "Show2 (2005)",
            "a-1-b",
            "İstanbul Diaries",
            "ℌello 3rd Rock",
            "  mixed   Whitespace\tand/Slash ",
            "",
            "!!!",
        ];
        for s in samples {
            let once = normalize_name(s);
            assert_eq!(normalize_name(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_empty_and_symbols() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("!!!"), "");
    }
}
