// SonicPalette prompt pipeline.
//
// Turns a free-text "vibe" description into a word-limited music
// generation prompt plus the structured data behind it (styles, emotions,
// BPM range, instruments, chord progressions, reference tracks).
//
// Architecture, leaf-first:
// - `tokenize.rs`: lowercase ASCII words + single CJK characters, keyword hits
// - `similarity.rs`: `SimilarityScorer` trait, `TokenCosine` strategy
// - `emotion.rs`: keyword and similarity-ranked emotion detection
// - `scoring.rs`: per-style keyword/affinity/bonus scores, semantic blend
// - `analyzer.rs`: `VibeAnalyzer` strategy (keyword or semantic)
// - `select.rs`: top styles, tempo blend, instruments, chords, references
// - `prefs.rs`: tempo and texture preference adjustments
// - `compose.rs`: prompt sections and five-stage word-budget compression
// - `engine.rs`: `PromptEngine`, the per-request pipeline
// - `config.rs`: `PromptConfig`, every tunable constant (serde JSON)
// - `intent.rs`: `UserIntent` and the preference enums
// - `error.rs`: `PromptError`
//
// The lexicon comes from `sonic_palette_lexicon` and randomness from an
// injected `sonic_palette_prng::VibeRng`. Nothing in this crate does I/O
// except `PromptConfig::load`.

pub mod analyzer;
pub mod compose;
pub mod config;
pub mod emotion;
pub mod engine;
pub mod error;
pub mod intent;
pub mod prefs;
pub mod scoring;
pub mod select;
pub mod similarity;
pub mod tokenize;

pub use analyzer::{KeywordAnalyzer, SemanticAnalyzer, VibeAnalyzer};
pub use config::{KeywordMatch, PromptConfig, WordBudget};
pub use engine::{PromptEngine, PromptResult};
pub use error::{PromptError, Result, UnknownPreference};
pub use intent::{EraPref, TempoPref, TexturePref, UserIntent};
pub use similarity::{SimilarityScorer, TokenCosine};
