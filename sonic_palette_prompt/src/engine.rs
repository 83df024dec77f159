// The request pipeline.
//
// `PromptEngine` owns a lexicon, a config and one analyzer strategy, all
// fixed at construction. `generate` runs a single request through the
// stages in order:
//
//   tokenize → emotions → style scores → top styles → tempo blend →
//   instruments → chords (rng) → preferences → references (rng) → prompt
//
// The engine holds no per-request state; the only mutable input is the
// caller's `VibeRng`, so a fixed seed reproduces a result exactly.

use crate::analyzer::{KeywordAnalyzer, VibeAnalyzer};
use crate::compose::{format_prompt, word_count};
use crate::config::PromptConfig;
use crate::error::{PromptError, Result};
use crate::intent::UserIntent;
use crate::prefs::apply_prefs;
use crate::select::{
    blend_bpm, collect_instruments, pick_chords, pick_top_styles, suggest_references,
};
use crate::tokenize::tokenize;
use serde::{Deserialize, Serialize};
use sonic_palette_lexicon::{ChordTemplate, Lexicon, ReferenceTrack, StyleProfile, TempoRange};
use sonic_palette_prng::VibeRng;
use tracing::{debug, warn};

/// Everything a request produces: the prompt text plus the structured data
/// it was composed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResult {
    pub styles: Vec<String>,
    pub emotions: Vec<String>,
    pub bpm_range: TempoRange,
    pub instruments: Vec<String>,
    pub chords: Vec<ChordTemplate>,
    pub references: Vec<ReferenceTrack>,
    pub prompt: String,
}

impl PromptResult {
    pub fn word_count(&self) -> usize {
        word_count(&self.prompt)
    }
}

#[derive(Debug, Clone)]
pub struct PromptEngine<A = KeywordAnalyzer> {
    lexicon: Lexicon,
    config: PromptConfig,
    analyzer: A,
}

impl PromptEngine<KeywordAnalyzer> {
    /// Keyword analyzer over the given lexicon and config.
    pub fn keyword(lexicon: Lexicon, config: PromptConfig) -> Result<Self> {
        Self::new(lexicon, config, KeywordAnalyzer)
    }
}

impl<A: VibeAnalyzer> PromptEngine<A> {
    /// Validates the config and checks that every default style exists in
    /// the lexicon. Lexicon inconsistencies that the pipeline tolerates
    /// (dangling affinity or bonus names) are logged, not rejected.
    pub fn new(lexicon: Lexicon, config: PromptConfig, analyzer: A) -> Result<Self> {
        config.validate()?;

        if let Some(missing) = config
            .default_styles
            .iter()
            .find(|name| lexicon.style(name).is_none())
        {
            return Err(PromptError::UnknownStyle(missing.clone()));
        }

        for warning in lexicon.validate(&config.generic_reference_bucket) {
            warn!("lexicon: {warning}");
        }
        for bonus in &config.tie_breaks {
            for style in bonus.styles.keys() {
                if lexicon.style(style).is_none() {
                    warn!("tie-break bonus names unknown style '{style}', ignoring");
                }
            }
        }
        if !lexicon.has_emotion(&config.fallback_emotion) {
            warn!(
                "fallback emotion '{}' is not in the lexicon",
                config.fallback_emotion
            );
        }

        Ok(PromptEngine {
            lexicon,
            config,
            analyzer,
        })
    }

    pub fn config(&self) -> &PromptConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Run one request. Fails only on an empty description or a selected
    /// style missing from the lexicon.
    pub fn generate(&self, intent: &UserIntent, rng: &mut VibeRng) -> Result<PromptResult> {
        let text = intent.description.trim();
        if text.is_empty() {
            return Err(PromptError::EmptyDescription);
        }
        let config = &self.config;
        let lexicon = &self.lexicon;

        let tokens = tokenize(text);
        let emotions = self.analyzer.detect_emotions(lexicon, config, text, &tokens);
        debug!(
            analyzer = self.analyzer.name(),
            tokens = tokens.len(),
            ?emotions,
            "emotions detected"
        );

        let scores = self
            .analyzer
            .score_styles(lexicon, config, text, &tokens, &emotions);
        debug!(?scores, "styles scored");

        let styles = pick_top_styles(&scores, config.top_styles, &config.default_styles);
        let profiles = styles
            .iter()
            .map(|name| {
                lexicon
                    .style(name)
                    .ok_or_else(|| PromptError::UnknownStyle(name.clone()))
            })
            .collect::<Result<Vec<&StyleProfile>>>()?;

        let bpm = blend_bpm(&profiles)
            .ok_or_else(|| PromptError::InvalidConfig("no styles selected".into()))?;
        let instruments = collect_instruments(&profiles, config.instrument_cap);
        let chords = pick_chords(&profiles, config.chord_count, rng);
        debug!(
            ?styles,
            %bpm,
            instruments = instruments.len(),
            chords = chords.len(),
            "styles aggregated"
        );

        let (bpm, instruments) = apply_prefs(bpm, &instruments, intent, config);
        let references = suggest_references(
            lexicon,
            &styles,
            &emotions,
            config.reference_count,
            &config.generic_reference_bucket,
            rng,
        );

        let prompt = format_prompt(
            &styles,
            &emotions,
            bpm,
            &instruments,
            &chords,
            &references,
            &config.word_budget(),
        );
        debug!(words = word_count(&prompt), "prompt composed");

        Ok(PromptResult {
            styles,
            emotions,
            bpm_range: bpm,
            instruments,
            chords,
            references,
            prompt,
        })
    }
}
