//! BLEU-style n-gram overlap between token streams.
//!
//! Both components use modified (clipped) precision over n = 1..4 combined
//! by geometric mean, with a brevity penalty for short candidates. The
//! weighted variant scales each n-gram by the mean weight of its tokens so
//! keyword agreement counts for more than identifier agreement.

use super::token::Token;
use std::collections::HashMap;

const MAX_N: usize = 4;

type GramCounts<'a> = HashMap<Vec<&'a str>, usize>;

fn gram_counts<'a>(
    tokens: &'a [Token],
    n: usize,
) -> GramCounts<'a> {
    let mut counts = GramCounts::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            let key: Vec<&str> = window.iter().map(|t| t.text.as_str()).collect();
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

fn brevity_penalty(
    reference_len: usize,
    candidate_len: usize,
) -> f64 {
    if candidate_len == 0 {
        return 0.0;
    }
    if candidate_len >= reference_len {
        1.0
    } else {
        (1.0 - reference_len as f64 / candidate_len as f64).exp()
    }
}

/// Plain n-gram match score in [0, 1]. Identical streams score 1.0.
#[must_use]
pub fn ngram_match(
    reference: &[Token],
    candidate: &[Token],
) -> f64 {
    combined_precision(reference, candidate, |_| 1.0)
}

/// Keyword-weighted n-gram match score in [0, 1].
#[must_use]
pub fn weighted_ngram_match(
    reference: &[Token],
    candidate: &[Token],
) -> f64 {
    combined_precision(reference, candidate, |window| {
        window.iter().map(Token::weight).sum::<f64>() / window.len() as f64
    })
}

fn combined_precision(
    reference: &[Token],
    candidate: &[Token],
    gram_weight: impl Fn(&[Token]) -> f64,
) -> f64 {
    if candidate.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let mut log_sum = 0.0;
    let mut orders = 0usize;

    for n in 1..=MAX_N {
        if candidate.len() < n {
            break;
        }
        let ref_counts = gram_counts(reference, n);

        let mut matched = 0.0;
        let mut total = 0.0;
        let mut seen: GramCounts = HashMap::new();

        for window in candidate.windows(n) {
            let key: Vec<&str> = window.iter().map(|t| t.text.as_str()).collect();
            let w = gram_weight(window);
            total += w;

            let used = seen.entry(key.clone()).or_insert(0);
            let allowed = ref_counts.get(&key).copied().unwrap_or(0);
            if *used < allowed {
                matched += w;
            }
            *used += 1;
        }

        // Add-one smoothing for higher orders so a single missing 4-gram
        // does not zero the whole score.
        let precision = if matched > 0.0 {
            matched / total
        } else if n > 1 {
            1.0 / (2.0 * total)
        } else {
            return 0.0;
        };

        log_sum += precision.ln();
        orders += 1;
    }

    if orders == 0 {
        return 0.0;
    }

    let geo_mean = (log_sum / orders as f64).exp();
    brevity_penalty(reference.len(), candidate.len()) * geo_mean
}
