// Analyzer strategies: how a description becomes emotions and style scores.
//
// The engine is built with exactly one analyzer and never branches on which
// one it has. `KeywordAnalyzer` is the dependency-free default;
// `SemanticAnalyzer` wraps any `SimilarityScorer` and blends its style
// similarities with the keyword score.

use crate::config::PromptConfig;
use crate::emotion::{detect_emotions_semantic, match_emotions};
use crate::scoring::{StyleScores, blend_scores, compute_style_scores, semantic_style_scores};
use crate::similarity::SimilarityScorer;
use sonic_palette_lexicon::Lexicon;

pub trait VibeAnalyzer {
    /// Detected emotion labels. Never empty.
    fn detect_emotions(
        &self,
        lexicon: &Lexicon,
        config: &PromptConfig,
        text: &str,
        tokens: &[String],
    ) -> Vec<String>;

    /// A score for every lexicon style.
    fn score_styles(
        &self,
        lexicon: &Lexicon,
        config: &PromptConfig,
        text: &str,
        tokens: &[String],
        emotions: &[String],
    ) -> StyleScores;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Keyword matching only.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAnalyzer;

impl VibeAnalyzer for KeywordAnalyzer {
    fn detect_emotions(
        &self,
        lexicon: &Lexicon,
        config: &PromptConfig,
        _text: &str,
        tokens: &[String],
    ) -> Vec<String> {
        match_emotions(lexicon, tokens, config)
    }

    fn score_styles(
        &self,
        lexicon: &Lexicon,
        config: &PromptConfig,
        _text: &str,
        tokens: &[String],
        emotions: &[String],
    ) -> StyleScores {
        compute_style_scores(lexicon, tokens, emotions, config)
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

/// Similarity-ranked emotions and a semantic/keyword style blend.
#[derive(Debug, Clone, Default)]
pub struct SemanticAnalyzer<S> {
    scorer: S,
}

impl<S: SimilarityScorer> SemanticAnalyzer<S> {
    pub fn new(scorer: S) -> Self {
        SemanticAnalyzer { scorer }
    }
}

impl<S: SimilarityScorer> VibeAnalyzer for SemanticAnalyzer<S> {
    fn detect_emotions(
        &self,
        lexicon: &Lexicon,
        config: &PromptConfig,
        text: &str,
        _tokens: &[String],
    ) -> Vec<String> {
        detect_emotions_semantic(lexicon, text, &self.scorer, config)
    }

    fn score_styles(
        &self,
        lexicon: &Lexicon,
        config: &PromptConfig,
        text: &str,
        tokens: &[String],
        emotions: &[String],
    ) -> StyleScores {
        let keyword = compute_style_scores(lexicon, tokens, emotions, config);
        let semantic = semantic_style_scores(lexicon, text, &self.scorer, config);
        blend_scores(&keyword, &semantic, config.semantic.weight)
    }

    fn name(&self) -> &'static str {
        "semantic"
    }
}
