// Pluggable text similarity for the semantic analyzer.
//
// The semantic path only needs "score these candidate texts against this
// query". Any embedding backend can sit behind `SimilarityScorer`; the crate
// ships `TokenCosine`, a bag-of-tokens cosine similarity built on the same
// tokenizer as the keyword path, so the semantic analyzer works without a
// model download.

use crate::tokenize::tokenize;
use std::collections::BTreeMap;

/// Scores candidate texts against a query.
pub trait SimilarityScorer {
    /// One score per candidate, in candidate order. Higher is more similar.
    fn similarities(&self, query: &str, candidates: &[String]) -> Vec<f64>;
}

impl<S: SimilarityScorer + ?Sized> SimilarityScorer for &S {
    fn similarities(&self, query: &str, candidates: &[String]) -> Vec<f64> {
        (**self).similarities(query, candidates)
    }
}

/// Cosine similarity between token-count vectors. Returns 0.0 when either
/// side has no tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCosine;

impl TokenCosine {
    fn counts(text: &str) -> BTreeMap<String, f64> {
        let mut counts = BTreeMap::new();
        for token in tokenize(text) {
            *counts.entry(token).or_insert(0.0) += 1.0;
        }
        counts
    }

    fn cosine(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
        let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
        let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        let dot: f64 = a
            .iter()
            .filter_map(|(token, va)| b.get(token).map(|vb| va * vb))
            .sum();
        dot / (norm_a * norm_b)
    }
}

impl SimilarityScorer for TokenCosine {
    fn similarities(&self, query: &str, candidates: &[String]) -> Vec<f64> {
        let q = Self::counts(query);
        candidates
            .iter()
            .map(|c| Self::cosine(&q, &Self::counts(c)))
            .collect()
    }
}
