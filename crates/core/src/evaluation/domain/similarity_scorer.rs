use serde::{Deserialize, Serialize};

use crate::shared::thousandths::round3;

pub const COVERAGE_WEIGHT: f64 = 0.7;
pub const EDIT_SIMILARITY_WEIGHT: f64 = 0.3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordScore {
    pub word: String,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityScore {
    /// Weighted blend of coverage and edit similarity, rounded to 3 decimals.
    pub overall: f64,
    /// One entry per expected token, in expected order.
    pub word_scores: Vec<WordScore>,
}

/// Scores a learner's (normalized) transcript against the expected line.
///
/// Two signals are blended: token coverage (how many expected tokens occur
/// anywhere in the attempt) and a Ratcliff/Obershelp edit similarity over the
/// raw strings. Inputs are expected to come from `TextNormalizer`.
pub struct SimilarityScorer;

impl SimilarityScorer {
    pub fn score(expected: &str, actual: &str) -> SimilarityScore {
        let expected_tokens = tokenize(expected);
        let actual_tokens = tokenize(actual);

        let word_scores: Vec<WordScore> = expected_tokens
            .iter()
            .map(|token| WordScore {
                word: token.clone(),
                score: if actual_tokens.contains(token) { 1.0 } else { 0.0 },
            })
            .collect();

        let matched = word_scores.iter().filter(|w| w.score > 0.0).count();
        let coverage = matched as f64 / expected_tokens.len().max(1) as f64;
        let edit = edit_similarity(expected, actual);

        SimilarityScore {
            overall: round3(COVERAGE_WEIGHT * coverage + EDIT_SIMILARITY_WEIGHT * edit),
            word_scores,
        }
    }
}

/// Whitespace-separated words when the text has spaces; otherwise one token
/// per character, for scripts written without word boundaries.
pub fn tokenize(text: &str) -> Vec<String> {
    if text.contains(' ') {
        text.split_whitespace().map(str::to_string).collect()
    } else {
        text.chars().map(String::from).collect()
    }
}

/// `2·M / (len(a) + len(b))`, where `M` is the total size of the matching
/// blocks found by repeatedly taking the longest common substring and
/// recursing on either side of it. Zero when either string is empty.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let matched = matching_length(&a, &b);
    2.0 * matched as f64 / (a.len() + b.len()) as f64
}

fn matching_length(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    total
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
/// Ties go to the run that ends first in `a`, then first in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    // run[x + 1]: length of the common run ending at the current a-char and b[blo + x].
    let mut prev = vec![0usize; width + 1];
    let mut run = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let x = j - blo;
            run[x + 1] = if a[i] == b[j] { prev[x] + 1 } else { 0 };
            let k = run[x + 1];
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut run);
    }

    best
}
