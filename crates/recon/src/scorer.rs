//! Title similarity scoring.
//!
//! Scores are integers in `0..=100`. The default [`TokenScorer`] is a weighted
//! ratio over the usual token-based variants (plain, token-sort, token-set,
//! partial), computed on lowercased titles with punctuation folded to spaces.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Scaling applied to token-based variants so they never beat an exact ratio.
const UNBASE_SCALE: f64 = 0.95;

/// Capability used by the matcher to compare two titles.
pub trait TitleScorer: Sync {
    fn score(&self, query: &str, candidate: &str) -> u8;
}

impl<F> TitleScorer for F
where
    F: Fn(&str, &str) -> u8 + Sync,
{
    fn score(&self, query: &str, candidate: &str) -> u8 {
        self(query, candidate)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenScorer;

impl TitleScorer for TokenScorer {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        weighted_ratio(query, candidate)
    }
}

/// Lowercase, replace every non-alphanumeric char with a space, collapse
/// whitespace runs to a single space.
pub fn preprocess(s: &str) -> String {
    let folded: String = s
        .chars()
        .flat_map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![' ']
            }
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Weighted ratio of two raw titles. Returns 0 if either side is empty after
/// preprocessing.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let p1 = preprocess(a);
    let p2 = preprocess(b);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let base = ratio(&p1, &p2);
    let len1 = p1.chars().count() as f64;
    let len2 = p2.chars().count() as f64;
    let len_ratio = len1.max(len2) / len1.min(len2);

    let best = if len_ratio < 1.5 {
        base.max(token_sort_ratio(&p1, &p2, ratio) * UNBASE_SCALE)
            .max(token_set_ratio(&p1, &p2, ratio) * UNBASE_SCALE)
    } else {
        let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.9 };
        base.max(partial_ratio(&p1, &p2) * partial_scale)
            .max(token_sort_ratio(&p1, &p2, partial_ratio) * UNBASE_SCALE * partial_scale)
            .max(token_set_ratio(&p1, &p2, partial_ratio) * UNBASE_SCALE * partial_scale)
    };

    best.round().clamp(0.0, 100.0) as u8
}

/// Normalized edit similarity on a 0–100 scale.
fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

/// Best `ratio` of the shorter string against each equal-length window of the
/// longer one.
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
    let short_len = short.chars().count();
    if short_len == 0 {
        return 0.0;
    }

    let long_chars: Vec<char> = long.chars().collect();
    let mut best = 0.0_f64;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        best = best.max(ratio(short, &window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str, cmp: fn(&str, &str) -> f64) -> f64 {
    cmp(&sorted_tokens(a), &sorted_tokens(b))
}

fn token_set_ratio(a: &str, b: &str, cmp: fn(&str, &str) -> f64) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |it: Vec<&str>| it.join(" ");
    let sect = join(set_a.intersection(&set_b).copied().collect());
    let diff_ab = join(set_a.difference(&set_b).copied().collect());
    let diff_ba = join(set_b.difference(&set_a).copied().collect());

    let combined_ab = format!("{sect} {diff_ab}").trim().to_string();
    let combined_ba = format!("{sect} {diff_ba}").trim().to_string();

    [
        cmp(&sect, &combined_ab),
        cmp(&sect, &combined_ba),
        cmp(&combined_ab, &combined_ba),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}
