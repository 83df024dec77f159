// Style selection and attribute aggregation.
//
// Picks the top styles from a score map, then merges the selected styles'
// attributes: a blended tempo range, a capped de-duplicated instrument list,
// and randomly sampled chord progressions and reference tracks. Random
// choices draw from the caller's `VibeRng` so a fixed seed reproduces them.

use crate::scoring::StyleScores;
use sonic_palette_lexicon::{ChordTemplate, Lexicon, ReferenceTrack, StyleProfile, TempoRange};
use sonic_palette_prng::VibeRng;
use std::collections::HashSet;

/// The `k` best styles with a strictly positive score, best first. Ties keep
/// lexicon order. With no positive score, the first `k` of `defaults`.
pub fn pick_top_styles(scores: &StyleScores, k: usize, defaults: &[String]) -> Vec<String> {
    let mut ranked: Vec<(&String, f64)> = scores.iter().map(|(name, s)| (name, *s)).collect();
    // `sort_by` is stable, so equal scores stay in insertion order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let top: Vec<String> = ranked
        .into_iter()
        .filter(|(_, score)| *score > 0.0)
        .take(k)
        .map(|(name, _)| name.clone())
        .collect();

    if top.is_empty() {
        defaults.iter().take(k).cloned().collect()
    } else {
        top
    }
}

/// Average the lows and the highs (truncating). If that collapses or
/// inverts the range, widen to (min low, max high). `None` for no styles.
///
/// Lexicon styles all have `low < high`, so the result does too. A
/// hand-built single-BPM style (`low == high`) is the only way to get a
/// point range back.
pub fn blend_bpm(styles: &[&StyleProfile]) -> Option<TempoRange> {
    if styles.is_empty() {
        return None;
    }
    let n = styles.len() as u32;
    let low_sum: u32 = styles.iter().map(|s| u32::from(s.tempo.low)).sum();
    let high_sum: u32 = styles.iter().map(|s| u32::from(s.tempo.high)).sum();
    let low = (low_sum / n) as u16;
    let high = (high_sum / n) as u16;

    if low < high {
        return Some(TempoRange::new(low, high));
    }
    let min_low = styles.iter().map(|s| s.tempo.low).min()?;
    let max_high = styles.iter().map(|s| s.tempo.high).max()?;
    Some(TempoRange::new(min_low, max_high))
}

/// Keep the first occurrence of each item, then cut to `cap`.
pub fn unique_capped<I>(items: I, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .take(cap)
        .collect()
}

/// Instruments of the selected styles, in selection order, unique, capped.
pub fn collect_instruments(styles: &[&StyleProfile], cap: usize) -> Vec<String> {
    unique_capped(
        styles.iter().flat_map(|s| s.instruments.iter().cloned()),
        cap,
    )
}

/// Up to `n` chord progressions with distinct Roman-numeral labels, drawn
/// at random from the selected styles' pools.
pub fn pick_chords(styles: &[&StyleProfile], n: usize, rng: &mut VibeRng) -> Vec<ChordTemplate> {
    let mut pool: Vec<&ChordTemplate> = styles.iter().flat_map(|s| s.chords.iter()).collect();
    rng.shuffle(&mut pool);

    let mut seen = HashSet::new();
    pool.into_iter()
        .filter(|c| seen.insert(c.roman.as_str()))
        .take(n)
        .cloned()
        .collect()
}

/// Up to `n` reference tracks with distinct titles, drawn at random from the
/// selected styles plus the generic bucket.
///
/// `emotions` is accepted for a future emotion-aware pick and does not
/// affect the result.
pub fn suggest_references(
    lexicon: &Lexicon,
    styles: &[String],
    _emotions: &[String],
    n: usize,
    generic_bucket: &str,
    rng: &mut VibeRng,
) -> Vec<ReferenceTrack> {
    let mut pool: Vec<&ReferenceTrack> = styles
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(generic_bucket))
        .flat_map(|name| lexicon.references_for(name).iter())
        .collect();
    rng.shuffle(&mut pool);

    let mut seen = HashSet::new();
    pool.into_iter()
        .filter(|r| seen.insert(r.title.as_str()))
        .take(n)
        .cloned()
        .collect()
}
