// Emotion detection.
//
// Two interchangeable detectors:
// - keyword: an emotion is hit when any of its keywords is a token
// - semantic: rank emotion descriptors ("{label} music: k1, k2, k3") by
//   similarity to the raw text and keep the top few above a threshold
//
// Both return labels in a deterministic order and never return an empty
// list: with no hit they report the configured fallback emotion.

use crate::config::PromptConfig;
use crate::similarity::SimilarityScorer;
use crate::tokenize::keyword_hit;
use sonic_palette_lexicon::Lexicon;

/// Emotions whose keywords appear in `tokens`, in lexicon order.
pub fn match_emotions(lexicon: &Lexicon, tokens: &[String], config: &PromptConfig) -> Vec<String> {
    let hits: Vec<String> = lexicon
        .emotions()
        .iter()
        .filter(|e| {
            e.keywords
                .iter()
                .any(|kw| keyword_hit(tokens, kw, config.keyword_match))
        })
        .map(|e| e.label.clone())
        .collect();

    if hits.is_empty() {
        vec![config.fallback_emotion.clone()]
    } else {
        hits
    }
}

/// "`{name} music: {first n keywords}`", the text a similarity backend
/// compares the description against.
pub fn descriptor(name: &str, keywords: &[String], n: usize) -> String {
    let shown = &keywords[..n.min(keywords.len())];
    format!("{name} music: {}", shown.join(", "))
}

/// Emotions ranked by similarity between `text` and each emotion's
/// descriptor, best first.
pub fn detect_emotions_semantic<S: SimilarityScorer + ?Sized>(
    lexicon: &Lexicon,
    text: &str,
    scorer: &S,
    config: &PromptConfig,
) -> Vec<String> {
    let params = &config.semantic;
    let descriptors: Vec<String> = lexicon
        .emotions()
        .iter()
        .map(|e| descriptor(&e.label, &e.keywords, params.emotion_descriptor_keywords))
        .collect();
    let scores = scorer.similarities(text, &descriptors);

    let mut ranked: Vec<(usize, f64)> = (0..descriptors.len())
        .map(|i| (i, scores.get(i).copied().unwrap_or(0.0)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let hits: Vec<String> = ranked
        .into_iter()
        .take(params.emotion_top_n)
        .filter(|(_, score)| *score > params.emotion_threshold)
        .map(|(i, _)| lexicon.emotions()[i].label.clone())
        .collect();

    if hits.is_empty() {
        vec![config.fallback_emotion.clone()]
    } else {
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::TokenCosine;
    use crate::tokenize::tokenize;
    use sonic_palette_lexicon::default_lexicon;

    /// Returns fixed scores regardless of input.
    struct Fixed(Vec<f64>);

    impl SimilarityScorer for Fixed {
        fn similarities(&self, _query: &str, _candidates: &[String]) -> Vec<f64> {
            self.0.clone()
        }
    }

    fn detect(text: &str) -> Vec<String> {
        match_emotions(
            &default_lexicon(),
            &tokenize(text),
            &PromptConfig::default(),
        )
    }

    #[test]
    fn test_keyword_hits_in_lexicon_order() {
        assert_eq!(detect("a dark and dreamy night"), vec!["dreamy", "dark"]);
    }

    #[test]
    fn test_reggae_is_tropical() {
        assert_eq!(detect("reggae sunny island vibes"), vec!["tropical"]);
    }

    #[test]
    fn test_case_insensitive_ascii() {
        assert_eq!(detect("NOSTALGIC"), vec!["nostalgic"]);
    }

    #[test]
    fn test_single_cjk_keyword() {
        assert_eq!(detect("劲"), vec!["energetic"]);
    }

    #[test]
    fn test_multi_char_cjk_needs_phrase_mode() {
        let lexicon = default_lexicon();
        let tokens = tokenize("怀旧的夏天");
        assert_eq!(
            match_emotions(&lexicon, &tokens, &PromptConfig::default()),
            vec!["chill"]
        );

        let phrase = PromptConfig {
            keyword_match: crate::config::KeywordMatch::Phrase,
            ..Default::default()
        };
        assert_eq!(
            match_emotions(&lexicon, &tokens, &phrase),
            vec!["nostalgic"]
        );
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        assert_eq!(detect("qwerty zxcv"), vec!["chill"]);
        assert_eq!(detect(""), vec!["chill"]);
    }

    #[test]
    fn test_descriptor() {
        let kws: Vec<String> = ["warm", "cozy", "gentle", "soft"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            descriptor("warm", &kws, 3),
            "warm music: warm, cozy, gentle"
        );
        assert_eq!(descriptor("warm", &kws[..1], 3), "warm music: warm");
    }

    #[test]
    fn test_semantic_top_three_above_threshold() {
        let lexicon = default_lexicon();
        // One score per emotion, lexicon order: warm, chill, melancholic,
        // energetic, dreamy, dark, romantic, nostalgic, urban, tropical.
        let scorer = Fixed(vec![0.1, 0.2, 0.9, 0.35, 0.8, 0.31, 0.7, 0.0, 0.0, 0.0]);
        let config = PromptConfig::default();
        let emotions = detect_emotions_semantic(&lexicon, "anything", &scorer, &config);
        assert_eq!(emotions, vec!["melancholic", "dreamy", "romantic"]);
    }

    #[test]
    fn test_semantic_threshold_is_strict() {
        let lexicon = default_lexicon();
        let scorer = Fixed(vec![0.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let config = PromptConfig::default();
        let emotions = detect_emotions_semantic(&lexicon, "anything", &scorer, &config);
        assert_eq!(emotions, vec!["chill"]);
    }

    #[test]
    fn test_semantic_with_token_cosine() {
        let lexicon = default_lexicon();
        let config = PromptConfig::default();
        let emotions =
            detect_emotions_semantic(&lexicon, "warm cozy gentle", &TokenCosine, &config);
        assert_eq!(emotions[0], "warm");
    }
}
