// Style scoring.
//
// Keyword score per style, in three additive layers:
// 1. +1.0 for every distinct style keyword found among the tokens
// 2. + the affinity weight of each detected emotion for the style
// 3. + fixed tie-break bonuses when a marker word ("retro", "modern", ...)
//    is present
//
// The semantic score compares the raw text against a short per-style
// descriptor; `blend_scores` mixes the two linearly.
//
// Scores are kept in an `IndexMap` in lexicon order. Every lexicon style
// gets an entry (possibly 0.0) and nothing else does: affinities or bonuses
// naming an unknown style are ignored.

use crate::config::PromptConfig;
use crate::emotion::descriptor;
use crate::similarity::SimilarityScorer;
use crate::tokenize::keyword_hit;
use indexmap::IndexMap;
use sonic_palette_lexicon::Lexicon;
use std::collections::HashSet;

/// Style name → score, in lexicon order.
pub type StyleScores = IndexMap<String, f64>;

/// Every lexicon style at 0.0.
fn zeroed(lexicon: &Lexicon) -> StyleScores {
    lexicon
        .styles()
        .iter()
        .map(|s| (s.name.clone(), 0.0))
        .collect()
}

pub fn compute_style_scores(
    lexicon: &Lexicon,
    tokens: &[String],
    emotions: &[String],
    config: &PromptConfig,
) -> StyleScores {
    let mut scores = zeroed(lexicon);

    for style in lexicon.styles() {
        let mut seen = HashSet::new();
        let hits = style
            .keywords
            .iter()
            .filter(|kw| seen.insert(kw.to_lowercase()))
            .filter(|kw| keyword_hit(tokens, kw, config.keyword_match))
            .count();
        if let Some(score) = scores.get_mut(&style.name) {
            *score += hits as f64;
        }
    }

    for emotion in emotions {
        let Some(weights) = lexicon.affinities_for(emotion) else {
            continue;
        };
        for (style, weight) in weights {
            if let Some(score) = scores.get_mut(style) {
                *score += weight;
            }
        }
    }

    for tie_break in &config.tie_breaks {
        let marked = tie_break
            .markers
            .iter()
            .any(|m| keyword_hit(tokens, m, config.keyword_match));
        if !marked {
            continue;
        }
        for (style, bonus) in &tie_break.styles {
            if let Some(score) = scores.get_mut(style) {
                *score += bonus;
            }
        }
    }

    scores
}

/// Similarity between `text` and each style's descriptor.
pub fn semantic_style_scores<S: SimilarityScorer + ?Sized>(
    lexicon: &Lexicon,
    text: &str,
    scorer: &S,
    config: &PromptConfig,
) -> StyleScores {
    let n = config.semantic.style_descriptor_keywords;
    let descriptors: Vec<String> = lexicon
        .styles()
        .iter()
        .map(|s| descriptor(&s.name, &s.keywords, n))
        .collect();
    let similarities = scorer.similarities(text, &descriptors);

    lexicon
        .styles()
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.clone(), similarities.get(i).copied().unwrap_or(0.0)))
        .collect()
}

/// `weight * semantic + (1 - weight) * keyword`, over the keyword map's
/// styles and order.
pub fn blend_scores(keyword: &StyleScores, semantic: &StyleScores, weight: f64) -> StyleScores {
    keyword
        .iter()
        .map(|(style, kw)| {
            let sem = semantic.get(style).copied().unwrap_or(0.0);
            (style.clone(), weight * sem + (1.0 - weight) * kw)
        })
        .collect()
}
