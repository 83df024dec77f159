// SonicPalette lexicon crate.
//
// Holds the static reference data the prompt pipeline scores against:
// emotion keywords, style profiles (keywords, tempo range, instruments,
// chord templates), reference tracks per style, and emotion→style affinity
// weights. The pipeline never mutates a `Lexicon`; it is built once and
// passed by reference.
//
// Architecture:
// - `types.rs`: `Emotion`, `StyleProfile`, `TempoRange`, `ChordTemplate`,
//   `ReferenceTrack`
// - `loader.rs`: the four named datasets, directory loading with
//   per-dataset fallback to the embedded defaults
// - `lib.rs` (this file): `Lexicon` struct, JSON parsing, validation
//
// The default datasets live in `data/*.json` at the workspace root and are
// embedded with `include_str!`, so a lexicon is always available even when
// no data directory is present.
//
// Iteration order is file order everywhere (indexmap), which the pipeline
// relies on for stable tie-breaking between equally scored styles.

pub mod loader;
pub mod types;

pub use loader::{Dataset, DatasetOrigin, LoadedLexicon, default_lexicon, load_dir};
pub use types::{ChordTemplate, Emotion, ReferenceTrack, StyleProfile, TempoRange};

use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or parsing lexicon datasets.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {dataset} dataset: {source}")]
    Json {
        dataset: Dataset,
        #[source]
        source: serde_json::Error,
    },

    #[error("style '{style}' has an empty or inverted tempo range {low}-{high}")]
    BadTempo { style: String, low: u16, high: u16 },
}

pub type Result<T> = std::result::Result<T, LexiconError>;

/// `emotions.json` record.
#[derive(Debug, Deserialize)]
struct EmotionRecord {
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    description: Option<String>,
}

/// `styles.json` record.
#[derive(Debug, Deserialize)]
struct StyleRecord {
    #[serde(default)]
    keywords: Vec<String>,
    bpm_min: u16,
    bpm_max: u16,
    #[serde(default)]
    instruments: Vec<String>,
    #[serde(default)]
    chords: Vec<ChordTemplate>,
    #[serde(default)]
    description: Option<String>,
}

/// Emotion → {style → additive weight}.
pub type AffinityTable = IndexMap<String, IndexMap<String, f64>>;

/// Style (or generic bucket) name → reference tracks.
pub type ReferenceTable = IndexMap<String, Vec<ReferenceTrack>>;

/// A dangling or suspicious entry found by [`Lexicon::validate`]. These do
/// not stop the pipeline: unknown names simply never score.
#[derive(Debug, Clone, PartialEq)]
pub enum LexiconWarning {
    AffinityUnknownEmotion { emotion: String },
    AffinityUnknownStyle { emotion: String, style: String },
    ReferencesUnknownStyle { style: String },
    NoKeywords { entry: String },
}

impl fmt::Display for LexiconWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexiconWarning::AffinityUnknownEmotion { emotion } => {
                write!(f, "affinity table names unknown emotion '{emotion}'")
            }
            LexiconWarning::AffinityUnknownStyle { emotion, style } => {
                write!(f, "affinity for '{emotion}' names unknown style '{style}'")
            }
            LexiconWarning::ReferencesUnknownStyle { style } => {
                write!(f, "references keyed by unknown style '{style}'")
            }
            LexiconWarning::NoKeywords { entry } => write!(f, "'{entry}' has no keywords"),
        }
    }
}

/// The loaded, read-only reference data.
#[derive(Debug, Clone)]
pub struct Lexicon {
    emotions: Vec<Emotion>,
    styles: Vec<StyleProfile>,
    references: ReferenceTable,
    affinities: AffinityTable,
}

impl Lexicon {
    /// Assemble a lexicon from already-built parts.
    pub fn from_parts(
        emotions: Vec<Emotion>,
        styles: Vec<StyleProfile>,
        references: ReferenceTable,
        affinities: AffinityTable,
    ) -> Self {
        Lexicon {
            emotions,
            styles,
            references,
            affinities,
        }
    }

    /// Parse all four datasets from JSON strings.
    pub fn from_json_parts(
        emotions: &str,
        styles: &str,
        references: &str,
        affinities: &str,
    ) -> Result<Self> {
        Ok(Lexicon {
            emotions: parse_emotions(emotions)?,
            styles: parse_styles(styles)?,
            references: parse_references(references)?,
            affinities: parse_affinities(affinities)?,
        })
    }

    /// All emotions, in file order.
    pub fn emotions(&self) -> &[Emotion] {
        &self.emotions
    }

    /// All styles, in file order.
    pub fn styles(&self) -> &[StyleProfile] {
        &self.styles
    }

    /// Look up a style by exact name.
    pub fn style(&self, name: &str) -> Option<&StyleProfile> {
        self.styles.iter().find(|s| s.name == name)
    }

    pub fn has_emotion(&self, label: &str) -> bool {
        self.emotions.iter().any(|e| e.label == label)
    }

    /// Reference tracks for a style or bucket name; empty when absent.
    pub fn references_for(&self, name: &str) -> &[ReferenceTrack] {
        self.references.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Per-style weights for an emotion, if any are configured.
    pub fn affinities_for(&self, emotion: &str) -> Option<&IndexMap<String, f64>> {
        self.affinities.get(emotion)
    }

    /// Report dangling names and keyword-less entries.
    ///
    /// `generic_bucket` is the reference bucket that is deliberately not a
    /// style (filler references mixed into every request).
    pub fn validate(&self, generic_bucket: &str) -> Vec<LexiconWarning> {
        let mut warnings = Vec::new();

        for emotion in &self.emotions {
            if emotion.keywords.is_empty() {
                warnings.push(LexiconWarning::NoKeywords {
                    entry: emotion.label.clone(),
                });
            }
        }
        for style in &self.styles {
            if style.keywords.is_empty() {
                warnings.push(LexiconWarning::NoKeywords {
                    entry: style.name.clone(),
                });
            }
        }

        for (emotion, weights) in &self.affinities {
            if !self.has_emotion(emotion) {
                warnings.push(LexiconWarning::AffinityUnknownEmotion {
                    emotion: emotion.clone(),
                });
            }
            for style in weights.keys() {
                if self.style(style).is_none() {
                    warnings.push(LexiconWarning::AffinityUnknownStyle {
                        emotion: emotion.clone(),
                        style: style.clone(),
                    });
                }
            }
        }

        for style in self.references.keys() {
            if style != generic_bucket && self.style(style).is_none() {
                warnings.push(LexiconWarning::ReferencesUnknownStyle {
                    style: style.clone(),
                });
            }
        }

        warnings
    }
}

/// Parse `emotions.json`: `{label: {keywords: [...], description: "..."}}`.
pub fn parse_emotions(json: &str) -> Result<Vec<Emotion>> {
    let records: IndexMap<String, EmotionRecord> =
        serde_json::from_str(json).map_err(|source| LexiconError::Json {
            dataset: Dataset::Emotions,
            source,
        })?;
    Ok(records
        .into_iter()
        .map(|(label, rec)| Emotion {
            label,
            keywords: rec.keywords,
            description: rec.description,
        })
        .collect())
}

/// Parse `styles.json`. Rejects styles whose `bpm_min` exceeds `bpm_max`.
pub fn parse_styles(json: &str) -> Result<Vec<StyleProfile>> {
    let records: IndexMap<String, StyleRecord> =
        serde_json::from_str(json).map_err(|source| LexiconError::Json {
            dataset: Dataset::Styles,
            source,
        })?;
    records
        .into_iter()
        .map(|(name, rec)| {
            if rec.bpm_min >= rec.bpm_max {
                return Err(LexiconError::BadTempo {
                    style: name,
                    low: rec.bpm_min,
                    high: rec.bpm_max,
                });
            }
            Ok(StyleProfile {
                name,
                keywords: rec.keywords,
                tempo: TempoRange::new(rec.bpm_min, rec.bpm_max),
                instruments: rec.instruments,
                chords: rec.chords,
                description: rec.description,
            })
        })
        .collect()
}

/// Parse `references.json`: `{style: [[title, note], ...]}`.
pub fn parse_references(json: &str) -> Result<ReferenceTable> {
    serde_json::from_str(json).map_err(|source| LexiconError::Json {
        dataset: Dataset::References,
        source,
    })
}

/// Parse `emotion_to_styles.json`: `{emotion: {style: weight}}`.
pub fn parse_affinities(json: &str) -> Result<AffinityTable> {
    serde_json::from_str(json).map_err(|source| LexiconError::Json {
        dataset: Dataset::Affinities,
        source,
    })
}
