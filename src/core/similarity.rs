//! String similarity scoring.
//!
//! Inputs are expected to be normalized already (see [`super::normalize`]).
//! The default metric is the Ratcliff/Obershelp "gestalt" ratio: find the
//! longest common block, recurse on the unmatched left and right remainders,
//! and score `2 * matched / total_len`.

use serde::{Deserialize, Serialize};

/// Default minimum score treated as a match.
pub const ACCEPT_THRESHOLD: f64 = 0.80;

/// A similarity metric returning scores in `[0, 1]`.
pub trait SimilarityMetric {
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Available metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Ratcliff/Obershelp matching-blocks ratio.
    #[default]
    Gestalt,
    /// `1 - levenshtein / max_len`.
    Levenshtein,
    /// Jaro-Winkler.
    JaroWinkler,
}

impl SimilarityMetric for Metric {
    fn score(&self, a: &str, b: &str) -> f64 {
        match self {
            Metric::Gestalt => gestalt_ratio(a, b),
            Metric::Levenshtein => strsim::normalized_levenshtein(a, b),
            Metric::JaroWinkler => strsim::jaro_winkler(a, b),
        }
    }
}

/// Result of comparing two names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    pub is_match: bool,
    pub score: f64,
}

/// A metric paired with its acceptance threshold.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    metric: Metric,
    threshold: f64,
}

impl Matcher {
    pub fn new(metric: Metric, threshold: f64) -> Self {
        Self { metric, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score two normalized names.
    pub fn similar(&self, a: &str, b: &str) -> Similarity {
        let score = self.metric.score(a, b);
        Similarity {
            is_match: score >= self.threshold,
            score,
        }
    }

    /// Raw score without the threshold check.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        self.metric.score(a, b)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(Metric::Gestalt, ACCEPT_THRESHOLD)
    }
}

/// Compare two normalized names with the default metric and threshold.
pub fn similar(a: &str, b: &str) -> Similarity {
    Matcher::default().similar(a, b)
}

/// Ratcliff/Obershelp similarity: `2 * M / T`.
///
/// Two empty strings are identical (1.0).
pub fn gestalt_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut row = vec![0usize; b.len() + 1];
    let mut next = vec![0usize; b.len() + 1];
    let matched = matching_chars(&a, &b, 0, a.len(), 0, b.len(), &mut row, &mut next);
    2.0 * matched as f64 / total as f64
}

/// Total size of the matching blocks within `a[alo..ahi]` and `b[blo..bhi]`.
#[allow(clippy::too_many_arguments)]
fn matching_chars(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
    row: &mut [usize],
    next: &mut [usize],
) -> usize {
    let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi, row, next);
    if k == 0 {
        return 0;
    }
    k + matching_chars(a, b, alo, i, blo, j, row, next)
        + matching_chars(a, b, i + k, ahi, j + k, bhi, row, next)
}

/// Longest common block `(i, j, len)`; ties go to the earliest `i`, then the
/// earliest `j`.
#[allow(clippy::too_many_arguments)]
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
    row: &mut [usize],
    next: &mut [usize],
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    // row[j + 1 - blo] = length of the common run ending at (i - 1, j)
    let width = bhi - blo + 1;
    row[..width].fill(0);

    for i in alo..ahi {
        next[..width].fill(0);
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let len = row[j - blo] + 1;
            next[j - blo + 1] = len;
            if len > best_len {
                best_i = i + 1 - len;
                best_j = j + 1 - len;
                best_len = len;
            }
        }
        row[..width].copy_from_slice(&next[..width]);
    }

    (best_i, best_j, best_len)
}
