// User preference adjustments.
//
// Applied after aggregation, before references and composition. Tempo
// preferences shift the blended range into a fixed BPM window; texture
// preferences merge a bonus instrument set. Era is carried on the intent
// but has no effect here.

use crate::config::PromptConfig;
use crate::intent::{TempoPref, TexturePref, UserIntent};
use crate::select::unique_capped;
use sonic_palette_lexicon::TempoRange;

/// Slow never drops below these.
const SLOW_LOW_FLOOR: u16 = 50;
const SLOW_HIGH_FLOOR: u16 = 55;
/// Fast never climbs above these.
const FAST_LOW_CEIL: u16 = 140;
const FAST_HIGH_CEIL: u16 = 150;

pub fn adjust_tempo(bpm: TempoRange, tempo: TempoPref) -> TempoRange {
    match tempo {
        TempoPref::Slow => TempoRange::new(
            bpm.low.saturating_sub(10).max(SLOW_LOW_FLOOR),
            bpm.low.saturating_add(5).max(SLOW_HIGH_FLOOR),
        ),
        TempoPref::Fast => TempoRange::new(
            bpm.high.saturating_add(5).min(FAST_LOW_CEIL),
            bpm.high.saturating_add(15).min(FAST_HIGH_CEIL),
        ),
        TempoPref::Auto | TempoPref::Medium => bpm,
    }
}

pub fn adjust_instruments(
    instruments: &[String],
    texture: TexturePref,
    config: &PromptConfig,
) -> Vec<String> {
    let cap = config.instrument_cap;
    match texture {
        TexturePref::Electronic => unique_capped(
            instruments
                .iter()
                .chain(&config.electronic_instruments)
                .cloned(),
            cap,
        ),
        TexturePref::Acoustic => unique_capped(
            config
                .acoustic_instruments
                .iter()
                .chain(instruments)
                .cloned(),
            cap,
        ),
        TexturePref::Auto => instruments.to_vec(),
    }
}

/// Tempo and texture adjustments for one request.
pub fn apply_prefs(
    bpm: TempoRange,
    instruments: &[String],
    intent: &UserIntent,
    config: &PromptConfig,
) -> (TempoRange, Vec<String>) {
    (
        adjust_tempo(bpm, intent.tempo),
        adjust_instruments(instruments, intent.texture, config),
    )
}
