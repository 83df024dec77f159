// End-to-end tests of the prompt pipeline against the default lexicon and
// small synthetic lexicons.

use sonic_palette_lexicon::{Lexicon, LexiconError, TempoRange, default_lexicon};
use sonic_palette_prng::VibeRng;
use sonic_palette_prompt::{
    PromptConfig, PromptEngine, PromptError, SemanticAnalyzer, TempoPref, TexturePref, TokenCosine,
    UserIntent,
};
use std::fs;

const DESCRIPTIONS: [&str; 8] = [
    "reggae sunny island vibes",
    "late night neon city drive, retro 80s",
    "dark moody noir rain with vinyl crackle",
    "dreamy hazy shimmer shoegaze",
    "energetic punchy upbeat synthwave",
    "sad melancholic post-rock build-up cinematic",
    "温暖 轻松 夜色",
    "qwerty zxcv",
];

const SYNTH_EMOTIONS: &str = r#"{
    "chill": {"keywords": ["chill"], "description": "laid back"},
    "dark": {"keywords": ["dark"]}
}"#;

const SYNTH_STYLES: &str = r#"{
    "R&B": {
        "keywords": ["soul"],
        "bpm_min": 70, "bpm_max": 95,
        "instruments": ["Rhodes", "Warm bass"],
        "chords": [{"roman": "Imaj7 – vi7 – ii7 – V7", "C": "Cmaj7 – Am7 – Dm7 – G7"}]
    },
    "Dream pop": {
        "keywords": ["shoegaze"],
        "bpm_min": 70, "bpm_max": 95,
        "instruments": ["Airy pad", "Warm bass"],
        "chords": [{"roman": "I – IV – Vsus – V", "C": "C – F – Gsus – G"}]
    },
    "Ambient": {
        "keywords": ["drone"],
        "bpm_min": 50, "bpm_max": 80,
        "instruments": ["Evolving pads"],
        "chords": []
    }
}"#;

const SYNTH_REFERENCES: &str = r#"{
    "Ambient": [["Brian Eno - An Ending (Ascent)", "pioneering ambient"]]
}"#;

const SYNTH_AFFINITIES: &str = r#"{
    "dark": {"Ambient": 0.5}
}"#;

fn engine() -> PromptEngine {
    PromptEngine::keyword(default_lexicon(), PromptConfig::default()).unwrap()
}

fn synthetic_lexicon() -> Lexicon {
    Lexicon::from_json_parts(
        SYNTH_EMOTIONS,
        SYNTH_STYLES,
        SYNTH_REFERENCES,
        SYNTH_AFFINITIES,
    )
    .unwrap()
}

#[test]
fn test_reggae_scenario() {
    let result = engine()
        .generate(
            &UserIntent::new("reggae sunny island vibes"),
            &mut VibeRng::new(1),
        )
        .unwrap();
    assert_eq!(result.emotions, vec!["tropical"]);
    assert_eq!(result.styles[0], "Reggae");
    // Reggae (60, 76) blended with City pop (95, 115).
    assert_eq!(result.bpm_range, TempoRange::new(77, 95));
    assert_eq!(result.chords.len(), 2);
    assert!(result.references.len() <= 5);
    assert!(result.prompt.contains("tempo: 77–95 BPM"));
}

#[test]
fn test_empty_description_rejected_before_scoring() {
    let engine = engine();
    let mut rng = VibeRng::new(1);
    let before = rng.clone();
    for text in ["", "    ", "\t\n"] {
        let err = engine.generate(&UserIntent::new(text), &mut rng).unwrap_err();
        assert!(matches!(err, PromptError::EmptyDescription), "{text:?}");
    }
    // Nothing was sampled.
    assert_eq!(rng.next_u64(), before.clone().next_u64());
}

#[test]
fn test_fast_tempo_scenario() {
    // Dream pop and R&B both span 70–95.
    let intent = UserIntent::new("smooth dreamy").with_tempo(TempoPref::Fast);
    let result = engine().generate(&intent, &mut VibeRng::new(4)).unwrap();
    assert_eq!(result.styles, vec!["Dream pop", "R&B"]);
    assert_eq!(result.bpm_range, TempoRange::new(100, 110));
}

#[test]
fn test_slow_tempo_and_acoustic_texture() {
    let intent = UserIntent::new("smooth dreamy")
        .with_tempo(TempoPref::Slow)
        .with_texture(TexturePref::Acoustic);
    let result = engine().generate(&intent, &mut VibeRng::new(4)).unwrap();
    assert_eq!(result.bpm_range, TempoRange::new(60, 75));
    assert_eq!(result.instruments[0], "Electric guitar (clean)");
    assert_eq!(result.instruments.len(), 8);
}

#[test]
fn test_no_hits_with_default_lexicon() {
    let result = engine()
        .generate(&UserIntent::new("qwerty zxcv"), &mut VibeRng::new(9))
        .unwrap();
    assert_eq!(result.emotions, vec!["chill"]);
    // The chill fallback still carries affinities.
    assert_eq!(result.styles, vec!["Lo-fi hiphop", "Dream pop"]);
    assert_eq!(result.bpm_range, TempoRange::new(67, 90));
    assert!(result.word_count() <= 200);
}

#[test]
fn test_no_hits_uses_default_pair() {
    let engine = PromptEngine::keyword(synthetic_lexicon(), PromptConfig::default()).unwrap();
    let result = engine
        .generate(&UserIntent::new("qwerty zxcv"), &mut VibeRng::new(9))
        .unwrap();
    assert_eq!(result.emotions, vec!["chill"]);
    assert_eq!(result.styles, vec!["R&B", "Dream pop"]);
    assert_eq!(result.bpm_range, TempoRange::new(70, 95));
    assert_eq!(result.instruments, vec!["Rhodes", "Warm bass", "Airy pad"]);
    // No references exist for either style or the generic bucket.
    assert!(result.references.is_empty());
    assert!(!result.prompt.contains("references:"));
    assert!(result.word_count() <= 200);
}

#[test]
fn test_missing_default_style_rejected() {
    let styles = r#"{
        "Ambient": {
            "keywords": ["drone"],
            "bpm_min": 50, "bpm_max": 80,
            "instruments": [],
            "chords": []
        }
    }"#;
    let lexicon = Lexicon::from_json_parts(SYNTH_EMOTIONS, styles, "{}", "{}").unwrap();
    let err = PromptEngine::keyword(lexicon, PromptConfig::default()).unwrap_err();
    assert!(matches!(err, PromptError::UnknownStyle(ref s) if s == "R&B"));
}

#[test]
fn test_tempo_prefs_at_u16_ceiling() {
    let styles = r#"{
        "Speedcore": {
            "keywords": ["speedcore"],
            "bpm_min": 300, "bpm_max": 65530,
            "instruments": ["Distorted kick"],
            "chords": []
        }
    }"#;
    let lexicon = Lexicon::from_json_parts(SYNTH_EMOTIONS, styles, "{}", "{}").unwrap();
    let config = PromptConfig {
        default_styles: vec!["Speedcore".into()],
        ..Default::default()
    };
    let engine = PromptEngine::keyword(lexicon, config).unwrap();

    let fast = UserIntent::new("speedcore").with_tempo(TempoPref::Fast);
    let result = engine.generate(&fast, &mut VibeRng::new(1)).unwrap();
    assert_eq!(result.bpm_range, TempoRange::new(140, 150));

    let slow = UserIntent::new("speedcore").with_tempo(TempoPref::Slow);
    let result = engine.generate(&slow, &mut VibeRng::new(1)).unwrap();
    assert_eq!(result.bpm_range, TempoRange::new(290, 305));
}

#[test]
fn test_single_bpm_style_rejected_at_load() {
    let styles = r#"{
        "Metronome": {
            "keywords": ["tick"],
            "bpm_min": 120, "bpm_max": 120,
            "instruments": [],
            "chords": []
        }
    }"#;
    let err = Lexicon::from_json_parts(SYNTH_EMOTIONS, styles, "{}", "{}").unwrap_err();
    assert!(matches!(err, LexiconError::BadTempo { low: 120, high: 120, .. }));
}

#[test]
fn test_same_seed_same_output() {
    let engine = engine();
    for text in DESCRIPTIONS {
        let intent = UserIntent::new(text).with_texture(TexturePref::Electronic);
        let a = engine.generate(&intent, &mut VibeRng::new(2024)).unwrap();
        let b = engine.generate(&intent, &mut VibeRng::new(2024)).unwrap();
        assert_eq!(a, b, "{text}");
    }
}

#[test]
fn test_prompt_fits_budget() {
    for max_words in [200, 80, 60] {
        let config = PromptConfig {
            max_words,
            ..Default::default()
        };
        let engine = PromptEngine::keyword(default_lexicon(), config).unwrap();
        for text in DESCRIPTIONS {
            for seed in 0..5 {
                let result = engine
                    .generate(&UserIntent::new(text), &mut VibeRng::new(seed))
                    .unwrap();
                assert!(
                    result.word_count() <= max_words,
                    "{text} seed {seed}: {} words > {max_words}",
                    result.word_count()
                );
            }
        }
    }
}

#[test]
fn test_result_invariants() {
    let engine = engine();
    for text in DESCRIPTIONS {
        for seed in 0..5 {
            let result = engine
                .generate(&UserIntent::new(text), &mut VibeRng::new(seed))
                .unwrap();
            assert!(!result.emotions.is_empty());
            assert!(!result.styles.is_empty() && result.styles.len() <= 2);
            assert!(result.bpm_range.low < result.bpm_range.high);
            assert!(result.instruments.len() <= 8);
            assert!(result.chords.len() <= 2);
            assert!(result.references.len() <= 5);
        }
    }
}

#[test]
fn test_semantic_engine() {
    let engine = PromptEngine::new(
        default_lexicon(),
        PromptConfig::default(),
        SemanticAnalyzer::new(TokenCosine),
    )
    .unwrap();
    let result = engine
        .generate(
            &UserIntent::new("dreamy hazy shimmer airy"),
            &mut VibeRng::new(5),
        )
        .unwrap();
    assert_eq!(result.emotions[0], "dreamy");
    assert_eq!(result.styles[0], "Dream pop");
    assert!(result.word_count() <= 200);
}

#[test]
fn test_config_from_json_override() {
    let json = r#"{"max_words": 60, "chord_count": 1, "top_styles": 1}"#;
    let config = PromptConfig::from_json(json).unwrap();
    let engine = PromptEngine::keyword(default_lexicon(), config).unwrap();
    let result = engine
        .generate(
            &UserIntent::new("reggae sunny island vibes"),
            &mut VibeRng::new(3),
        )
        .unwrap();
    assert_eq!(result.styles, vec!["Reggae"]);
    assert_eq!(result.bpm_range, TempoRange::new(60, 76));
    assert_eq!(result.chords.len(), 1);
    assert!(result.word_count() <= 60);
}

#[test]
fn test_lexicon_from_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("emotions.json"), SYNTH_EMOTIONS).unwrap();
    fs::write(dir.path().join("styles.json"), SYNTH_STYLES).unwrap();
    fs::write(dir.path().join("references.json"), SYNTH_REFERENCES).unwrap();
    fs::write(dir.path().join("emotion_to_styles.json"), SYNTH_AFFINITIES).unwrap();

    let lexicon = Lexicon::load_dir(dir.path());
    let engine = PromptEngine::keyword(lexicon, PromptConfig::default()).unwrap();
    let result = engine
        .generate(&UserIntent::new("a dark drone"), &mut VibeRng::new(8))
        .unwrap();
    assert_eq!(result.emotions, vec!["dark"]);
    assert_eq!(result.styles, vec!["Ambient"]);
    assert_eq!(result.references.len(), 1);
    assert!(result.prompt.contains("mix: moody, noir"));
    assert!(result.prompt.contains("references: An Ending (Ascent)"));
}
