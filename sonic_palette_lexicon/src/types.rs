// Core lexicon types: emotions, style profiles, chord templates, references.
//
// These are the in-memory shapes the prompt pipeline consumes. The on-disk
// JSON layout differs slightly (styles store `bpm_min`/`bpm_max`, references
// are `[title, note]` pairs); `lib.rs` owns the conversion from file records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An emotion label and the keywords that trigger it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emotion {
    pub label: String,
    /// Keywords in file order. ASCII keywords match case-insensitively,
    /// everything else verbatim.
    pub keywords: Vec<String>,
    pub description: Option<String>,
}

/// Inclusive tempo range in beats per minute. Always `low < high` for
/// ranges loaded from a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoRange {
    pub low: u16,
    pub high: u16,
}

impl TempoRange {
    pub fn new(low: u16, high: u16) -> Self {
        TempoRange { low, high }
    }
}

impl fmt::Display for TempoRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.low, self.high)
    }
}

/// A chord progression in Roman-numeral notation with one concrete
/// realization in C. Descriptive only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordTemplate {
    pub roman: String,
    #[serde(rename = "C")]
    pub in_c: String,
}

impl ChordTemplate {
    pub fn new(roman: &str, in_c: &str) -> Self {
        ChordTemplate {
            roman: roman.to_string(),
            in_c: in_c.to_string(),
        }
    }
}

/// A reference track: "Artist - Title" plus a short note on why it fits.
///
/// Serialized as a two-element array to match the dataset files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct ReferenceTrack {
    pub title: String,
    pub note: String,
}

impl ReferenceTrack {
    pub fn new(title: &str, note: &str) -> Self {
        ReferenceTrack {
            title: title.to_string(),
            note: note.to_string(),
        }
    }

    /// The song title with any leading "Artist - " removed.
    pub fn song_title(&self) -> &str {
        match self.title.split_once(" - ") {
            Some((_, song)) => song,
            None => &self.title,
        }
    }
}

impl From<(String, String)> for ReferenceTrack {
    fn from((title, note): (String, String)) -> Self {
        ReferenceTrack { title, note }
    }
}

impl From<ReferenceTrack> for (String, String) {
    fn from(track: ReferenceTrack) -> Self {
        (track.title, track.note)
    }
}

/// A named musical style with its tempo, instrument palette and chords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub name: String,
    pub keywords: Vec<String>,
    pub tempo: TempoRange,
    /// Instruments in presentation priority order.
    pub instruments: Vec<String>,
    pub chords: Vec<ChordTemplate>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_title_strips_artist() {
        let r = ReferenceTrack::new("Massive Attack - Teardrop", "moody");
        assert_eq!(r.song_title(), "Teardrop");
    }

    #[test]
    fn test_song_title_splits_on_first_separator() {
        let r = ReferenceTrack::new("Toots & The Maytals - 54-46 - Live", "edge");
        assert_eq!(r.song_title(), "54-46 - Live");
    }

    #[test]
    fn test_song_title_without_artist() {
        let r = ReferenceTrack::new("Teardrop", "moody");
        assert_eq!(r.song_title(), "Teardrop");
    }

    #[test]
    fn test_reference_reads_pair() {
        let r: ReferenceTrack =
            serde_json::from_str(r#"["Portishead - Roads", "noir, cinematic"]"#).unwrap();
        assert_eq!(
            r,
            ReferenceTrack::new("Portishead - Roads", "noir, cinematic")
        );
    }

    #[test]
    fn test_chord_reads_c_key() {
        let c: ChordTemplate =
            serde_json::from_str(r#"{"roman": "ii – V – I", "C": "Dm – G – C"}"#).unwrap();
        assert_eq!(c.in_c, "Dm – G – C");
    }

    #[test]
    fn test_tempo_display_uses_en_dash() {
        assert_eq!(TempoRange::new(60, 76).to_string(), "60–76");
    }
}
