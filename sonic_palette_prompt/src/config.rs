// Tunable pipeline parameters.
//
// Every number and curated list the pipeline uses lives in `PromptConfig`:
// selection sizes, caps, the word budget, the fallback emotion and default
// style pair, the "retro"/"modern" tie-break bonuses, the texture bonus
// instrument sets and the semantic blend parameters. The config is plain
// JSON; every field has a default, so a file only needs the keys it changes.
//
// Section wording (groove, mix, structure lines) is presentation, not tuning,
// and stays in `compose.rs`.

use crate::error::{PromptError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How keywords are compared against the token stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatch {
    /// A keyword must equal a single token. Keywords that tokenize into
    /// several tokens (multi-character CJK words, "late night", "r&b")
    /// never match.
    #[default]
    Exact,
    /// As `Exact`, and a keyword that tokenizes into two or more tokens
    /// also matches when those tokens appear consecutively in the input.
    Phrase,
}

/// A fixed score bonus applied when any marker word is present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TieBreakBonus {
    /// Marker keywords, matched like style keywords.
    pub markers: Vec<String>,
    /// Style name → bonus. Styles missing from the lexicon are skipped.
    pub styles: IndexMap<String, f64>,
}

/// Parameters of the semantic (similarity-based) analyzer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticParams {
    /// Share of the final style score taken from similarity; the rest comes
    /// from the keyword score.
    pub weight: f64,
    /// An emotion is accepted only when its similarity is strictly above this.
    pub emotion_threshold: f64,
    pub emotion_top_n: usize,
    /// Keywords quoted in each emotion descriptor.
    pub emotion_descriptor_keywords: usize,
    /// Keywords quoted in each style descriptor.
    pub style_descriptor_keywords: usize,
}

impl Default for SemanticParams {
    fn default() -> Self {
        SemanticParams {
            weight: 0.7,
            emotion_threshold: 0.3,
            emotion_top_n: 3,
            emotion_descriptor_keywords: 3,
            style_descriptor_keywords: 4,
        }
    }
}

/// Word-budget settings consumed by the compressor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordBudget {
    pub max_words: usize,
    /// List sections longer than this are cut to this many items + "etc.".
    pub list_item_cap: usize,
    /// The word trim never shortens a section below this many words.
    pub word_floor: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub max_words: usize,
    pub top_styles: usize,
    pub chord_count: usize,
    pub reference_count: usize,
    pub instrument_cap: usize,
    pub list_item_cap: usize,
    pub word_floor: usize,

    /// Emotion reported when nothing matches.
    pub fallback_emotion: String,
    /// Styles used when no style scores above zero.
    pub default_styles: Vec<String>,
    /// Reference bucket mixed into every request regardless of style.
    pub generic_reference_bucket: String,

    pub keyword_match: KeywordMatch,
    pub tie_breaks: Vec<TieBreakBonus>,

    /// Appended to the instrument list for `texture = electronic`.
    pub electronic_instruments: Vec<String>,
    /// Prepended to the instrument list for `texture = acoustic`.
    pub acoustic_instruments: Vec<String>,

    pub semantic: SemanticParams,
}

impl Default for PromptConfig {
    fn default() -> Self {
        PromptConfig {
            max_words: 200,
            top_styles: 2,
            chord_count: 2,
            reference_count: 5,
            instrument_cap: 8,
            list_item_cap: 4,
            word_floor: 5,
            fallback_emotion: "chill".into(),
            default_styles: vec!["R&B".into(), "Dream pop".into()],
            generic_reference_bucket: "Indie refs".into(),
            keyword_match: KeywordMatch::Exact,
            tie_breaks: vec![
                TieBreakBonus {
                    markers: vec!["retro".into(), "复古".into()],
                    styles: IndexMap::from([
                        ("City pop".to_string(), 0.3),
                        ("Synthwave".to_string(), 0.3),
                    ]),
                },
                TieBreakBonus {
                    markers: vec!["modern".into(), "现代".into()],
                    styles: IndexMap::from([("R&B".to_string(), 0.2)]),
                },
            ],
            electronic_instruments: strings(&[
                "Analog polysynth",
                "Arp synth",
                "Silky synth pad",
                "Sub-bass",
            ]),
            acoustic_instruments: strings(&[
                "Electric guitar (clean)",
                "Piano",
                "Strings",
                "Bass",
                "Drums",
            ]),
            semantic: SemanticParams::default(),
        }
    }
}

impl PromptConfig {
    /// Parse a config from a JSON string. Missing keys take their defaults.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| PromptError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data).map_err(|source| PromptError::ConfigJson {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn word_budget(&self) -> WordBudget {
        WordBudget {
            max_words: self.max_words,
            list_item_cap: self.list_item_cap,
            word_floor: self.word_floor,
        }
    }

    /// Reject settings the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.top_styles == 0 {
            return Err(PromptError::InvalidConfig("top_styles must be at least 1".into()));
        }
        if self.default_styles.is_empty() {
            return Err(PromptError::InvalidConfig("default_styles is empty".into()));
        }
        if self.max_words == 0 {
            return Err(PromptError::InvalidConfig("max_words must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.semantic.weight) {
            return Err(PromptError::InvalidConfig(format!(
                "semantic.weight {} is outside 0..=1",
                self.semantic.weight
            )));
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
