//! CodeBLEU-style code similarity scoring.
//!
//! Four independent components over a reference/candidate pair: token
//! n-gram overlap, keyword-weighted n-gram overlap, syntax-tree subtree
//! overlap, and approximate dataflow-relation overlap. The overall score
//! is their unweighted mean. The engine is an injected capability: when it
//! is absent, or a language is unsupported, the scorer reports
//! `available = false` with an error instead of fabricating numbers.

pub mod dataflow;
pub mod ngram;
pub mod syntax;
pub mod token;

use crate::language::Language;
use crate::normalize::{CodeFormatter, normalize_code};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of a verification request. `available = false` implies every
/// numeric field is absent and `error` is present.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SimilarityScore {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ngram_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_ngram_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataflow_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimilarityScore {
    #[must_use]
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            available: false,
            score: None,
            ngram_match: None,
            weighted_ngram_match: None,
            syntax_match: None,
            dataflow_match: None,
            error: Some(error.into()),
        }
    }

    #[must_use]
    fn from_components(components: ComponentScores) -> Self {
        Self {
            available: true,
            score: Some(components.overall()),
            ngram_match: Some(components.ngram),
            weighted_ngram_match: Some(components.weighted_ngram),
            syntax_match: Some(components.syntax),
            dataflow_match: Some(components.dataflow),
            error: None,
        }
    }
}

/// The four raw component scores, each already in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub ngram: f64,
    pub weighted_ngram: f64,
    pub syntax: f64,
    pub dataflow: f64,
}

impl ComponentScores {
    /// Unweighted mean of the components, clamped to [0, 1].
    #[must_use]
    pub fn overall(&self) -> f64 {
        ((self.ngram + self.weighted_ngram + self.syntax + self.dataflow) / 4.0).clamp(0.0, 1.0)
    }
}

/// A code similarity engine. Injected where scoring is needed so an absent
/// engine is an explicit, testable state rather than a load-time surprise.
pub trait SimilarityEngine: Send + Sync {
    fn supports(
        &self,
        language: Language,
    ) -> bool;

    /// Compares non-empty reference and candidate code.
    ///
    /// # Errors
    ///
    /// Returns a descriptive message when the comparison cannot be
    /// computed; callers report it, never propagate it.
    fn compare(
        &self,
        reference: &str,
        candidate: &str,
        language: Language,
    ) -> Result<ComponentScores, String>;
}

/// Built-in CodeBLEU-style engine over the crate's own lexer.
pub struct CodeBleuEngine;

impl SimilarityEngine for CodeBleuEngine {
    fn supports(
        &self,
        _language: Language,
    ) -> bool {
        true
    }

    fn compare(
        &self,
        reference: &str,
        candidate: &str,
        language: Language,
    ) -> Result<ComponentScores, String> {
        let ref_tokens = token::tokenize(reference, language);
        let cand_tokens = token::tokenize(candidate, language);

        if ref_tokens.is_empty() || cand_tokens.is_empty() {
            return Err("code contains no comparable tokens".to_string());
        }

        Ok(ComponentScores {
            ngram: ngram::ngram_match(&ref_tokens, &cand_tokens),
            weighted_ngram: ngram::weighted_ngram_match(&ref_tokens, &cand_tokens),
            syntax: syntax::syntax_match(&ref_tokens, &cand_tokens),
            dataflow: dataflow::dataflow_match(reference, candidate, language),
        })
    }
}

/// Scores `candidate` against `reference`, applying the normalizer first
/// when requested. Total function: every failure mode comes back as an
/// unavailable score with an error message.
#[must_use]
pub fn score_similarity(
    engine: Option<&dyn SimilarityEngine>,
    formatter: Option<&dyn CodeFormatter>,
    reference: &str,
    candidate: &str,
    language_tag: &str,
    normalize: bool,
) -> SimilarityScore {
    if reference.trim().is_empty() || candidate.trim().is_empty() {
        return SimilarityScore::unavailable(
            "Both generated code (candidate) and reference code are required for verification",
        );
    }

    let Some(engine) = engine else {
        return SimilarityScore::unavailable("Similarity engine not available");
    };

    let Some(language) = Language::from_tag(language_tag) else {
        return SimilarityScore::unavailable(format!(
            "Unsupported comparison language: {language_tag}"
        ));
    };

    if !engine.supports(language) {
        return SimilarityScore::unavailable(format!(
            "Similarity engine does not support {language}"
        ));
    }

    let (reference, candidate) = if normalize {
        (
            normalize_code(reference, language, formatter),
            normalize_code(candidate, language, formatter),
        )
    } else {
        (reference.to_string(), candidate.to_string())
    };

    match engine.compare(&reference, &candidate, language) {
        Ok(components) => SimilarityScore::from_components(components),
        Err(e) => SimilarityScore::unavailable(format!("Verification failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::BasicFormatter;

    const SAMPLE: &str = "def add(a, b):\n    return a + b";

    #[test]
    fn test_identical_inputs_score_one_on_all_components() {
        let score = score_similarity(Some(&CodeBleuEngine), None, SAMPLE, SAMPLE, "python", false);

        assert!(score.available);
        assert!((score.score.unwrap() - 1.0).abs() < 1e-9);
        assert!((score.ngram_match.unwrap() - 1.0).abs() < 1e-9);
        assert!((score.weighted_ngram_match.unwrap() - 1.0).abs() < 1e-9);
        assert!((score.syntax_match.unwrap() - 1.0).abs() < 1e-9);
        assert!((score.dataflow_match.unwrap() - 1.0).abs() < 1e-9);
        assert!(score.error.is_none());
    }

    #[test]
    fn test_empty_candidate_unavailable() {
        let score = score_similarity(Some(&CodeBleuEngine), None, SAMPLE, "", "python", false);

        assert!(!score.available);
        assert!(score.error.as_deref().unwrap().contains("required"));
        assert!(score.score.is_none());
        assert!(score.ngram_match.is_none());
        assert!(score.dataflow_match.is_none());
    }

    #[test]
    fn test_empty_reference_unavailable() {
        let score = score_similarity(Some(&CodeBleuEngine), None, "   ", SAMPLE, "python", false);
        assert!(!score.available);
        assert!(score.error.is_some());
    }

    #[test]
    fn test_missing_engine_unavailable() {
        let score = score_similarity(None, None, SAMPLE, SAMPLE, "python", false);
        assert!(!score.available);
        assert!(score.error.as_deref().unwrap().contains("not available"));
    }

    #[test]
    fn test_unsupported_language_unavailable() {
        let score = score_similarity(Some(&CodeBleuEngine), None, SAMPLE, SAMPLE, "cobol", false);
        assert!(!score.available);
        assert!(score.error.as_deref().unwrap().contains("cobol"));
    }

    #[test]
    fn test_normalized_comparison_of_reformatted_code_scores_one() {
        let messy = "def add(a, b):\n\treturn a + b   \n\n\n";
        let strict = score_similarity(Some(&CodeBleuEngine), None, SAMPLE, messy, "python", false);
        let normalized = score_similarity(
            Some(&CodeBleuEngine),
            Some(&BasicFormatter),
            SAMPLE,
            messy,
            "python",
            true,
        );
        assert!(normalized.score.unwrap() >= strict.score.unwrap());
        assert!((normalized.score.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_related_code_scores_between_zero_and_one() {
        let candidate = "def add(x, y):\n    total = x + y\n    return total";
        let score = score_similarity(Some(&CodeBleuEngine), None, SAMPLE, candidate, "python", false);
        assert!(score.available);
        let overall = score.score.unwrap();
        assert!(overall > 0.0 && overall < 1.0);
    }
}
