// Prompt composition and word-budget compression.
//
// `build_sections` lays out the prompt as a fixed sequence of sections, each
// with a primary text, an optional shorter "degraded" text and a priority
// tier (1 = keep at all costs, 3 = first to shrink). `compress_sections`
// then fits them under the word budget in five escalating stages:
//
// 1. full: primaries joined with "; " and a final "."
// 2. soft-degrade: swap in degraded texts one at a time, highest tier
//    first, keeping every swap made so far
// 3. list-shortening: cut long `instr` and `mix` lists to N items + "etc."
// 4. delimiter tightening: join with ", " instead of "; "
// 5. word trim: drop trailing words from the longest section until the
//    budget is met or every section is down to the word floor
//
// Each stage returns as soon as the text fits. Stage 5 is best effort and
// can overshoot when many sections sit at the floor; compression itself
// never fails.

use crate::config::WordBudget;
use sonic_palette_lexicon::{ChordTemplate, ReferenceTrack, TempoRange};
use tracing::debug;

const GROOVE: &str = "groove: subtle swing, tasteful syncopation";
const GROOVE_SHORT: &str = "groove: light swing, syncopation";
const STRUCTURE: &str = "structure: intro – verse – chorus – verse – bridge – outro";
const STRUCTURE_SHORT: &str = "structure: intro–verse–chorus–bridge–outro";

const MIX_DEFAULT: [&str; 6] = [
    "warm",
    "silky",
    "tape saturation",
    "room reverb",
    "sidechain",
    "wide stereo",
];
const MIX_DARK: [&str; 5] = [
    "moody",
    "noir",
    "tape saturation",
    "tight room",
    "mono bass focus",
];
const PUNCHY: &str = "punchy drums";

const MAX_CHORDS: usize = 2;
const MAX_REFERENCES: usize = 3;
const MAX_REFERENCES_SHORT: usize = 2;

/// Sections whose comma lists stage 3 may shorten.
const LIST_SECTIONS: [&str; 2] = ["instr", "mix"];

const DELIMITER: &str = "; ";
const TIGHT_DELIMITER: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSection {
    pub name: &'static str,
    pub primary: String,
    pub degraded: Option<String>,
    /// Lower is more drop-resistant.
    pub tier: u8,
}

impl PromptSection {
    fn fixed(name: &'static str, primary: String) -> Self {
        PromptSection {
            name,
            primary,
            degraded: None,
            tier: 1,
        }
    }

    fn degradable(name: &'static str, primary: String, degraded: String, tier: u8) -> Self {
        PromptSection {
            name,
            primary,
            degraded: Some(degraded),
            tier,
        }
    }
}

/// Mix tags for the detected emotions. `dark` swaps in a darker set;
/// `energetic` replaces the sixth tag with "punchy drums".
pub fn mix_tags(emotions: &[String]) -> Vec<&'static str> {
    let has = |label: &str| emotions.iter().any(|e| e == label);

    let mut tags: Vec<&'static str> = if has("dark") {
        MIX_DARK.to_vec()
    } else {
        MIX_DEFAULT.to_vec()
    };
    if has("energetic") && !tags.contains(&PUNCHY) {
        tags.truncate(5);
        tags.push(PUNCHY);
    }
    tags
}

fn chord_text(chord: &ChordTemplate) -> String {
    format!("{} ({})", chord.roman, chord.in_c)
}

pub fn build_sections(
    styles: &[String],
    emotions: &[String],
    bpm: TempoRange,
    instruments: &[String],
    chords: &[ChordTemplate],
    references: &[ReferenceTrack],
) -> Vec<PromptSection> {
    let tags = mix_tags(emotions);
    let mix = |n: usize| format!("mix: {}", tags[..n.min(tags.len())].join(", "));

    let mut sections = vec![
        PromptSection::fixed("style", format!("{} style", styles.join(" + "))),
        PromptSection::fixed("mood", format!("{} mood", emotions.join(", "))),
        PromptSection::fixed(
            "instr",
            format!("instrumentation: {}", instruments.join(", ")),
        ),
        PromptSection::degradable("groove", GROOVE.into(), GROOVE_SHORT.into(), 2),
        PromptSection::degradable("mix", mix(6), mix(4), 2),
        PromptSection::fixed("tempo", format!("tempo: {bpm} BPM")),
    ];

    if let Some(first) = chords.first() {
        let all: Vec<String> = chords.iter().take(MAX_CHORDS).map(chord_text).collect();
        sections.push(PromptSection::degradable(
            "chords",
            format!("chords: {}", all.join(", ")),
            format!("chords: {}", chord_text(first)),
            2,
        ));
    }

    if !references.is_empty() {
        let titles: Vec<&str> = references
            .iter()
            .take(MAX_REFERENCES)
            .map(ReferenceTrack::song_title)
            .collect();
        let short = &titles[..MAX_REFERENCES_SHORT.min(titles.len())];
        sections.push(PromptSection::degradable(
            "references",
            format!("references: {}", titles.join(", ")),
            format!("refs: {}", short.join(", ")),
            2,
        ));
    }

    sections.push(PromptSection::degradable(
        "structure",
        STRUCTURE.into(),
        STRUCTURE_SHORT.into(),
        3,
    ));
    sections
}

/// Whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// "`head: a, b, c, d, e`" → "`head: a, b, c, d, etc.`" when the list
/// after the first ':' has more than `keep` items. Anything else is
/// returned unchanged.
pub fn shorten_list_line(line: &str, keep: usize) -> String {
    let Some((head, tail)) = line.split_once(':') else {
        return line.to_string();
    };
    let items: Vec<&str> = tail.split(',').map(str::trim).collect();
    if items.len() <= keep {
        return line.to_string();
    }
    format!("{}: {}, etc.", head.trim(), items[..keep].join(", "))
}

fn joined(parts: &[String], delimiter: &str) -> String {
    format!("{}.", parts.join(delimiter))
}

pub fn compress_sections(sections: &[PromptSection], budget: &WordBudget) -> String {
    let max = budget.max_words;
    let mut parts: Vec<String> = sections.iter().map(|s| s.primary.clone()).collect();

    let text = joined(&parts, DELIMITER);
    if word_count(&text) <= max {
        debug!(words = word_count(&text), "prompt fits in full");
        return text;
    }

    let mut tiers: Vec<u8> = sections.iter().map(|s| s.tier).collect();
    tiers.sort_unstable_by(|a, b| b.cmp(a));
    tiers.dedup();
    for tier in tiers {
        for (i, section) in sections.iter().enumerate() {
            if section.tier != tier {
                continue;
            }
            let Some(degraded) = &section.degraded else {
                continue;
            };
            parts[i] = degraded.clone();
            let text = joined(&parts, DELIMITER);
            if word_count(&text) <= max {
                debug!(
                    words = word_count(&text),
                    section = section.name,
                    "prompt fits after degrading"
                );
                return text;
            }
        }
    }

    for (i, section) in sections.iter().enumerate() {
        if LIST_SECTIONS.contains(&section.name) {
            parts[i] = shorten_list_line(&parts[i], budget.list_item_cap);
        }
    }
    let text = joined(&parts, DELIMITER);
    if word_count(&text) <= max {
        debug!(
            words = word_count(&text),
            "prompt fits after shortening lists"
        );
        return text;
    }

    let text = joined(&parts, TIGHT_DELIMITER);
    if word_count(&text) <= max {
        debug!(
            words = word_count(&text),
            "prompt fits with tight delimiters"
        );
        return text;
    }

    let text = trim_words(&parts, budget);
    debug!(words = word_count(&text), "prompt trimmed word by word");
    text
}

/// Stage 5. Repeatedly drops the last word of the first longest section
/// that is still above the floor.
fn trim_words(parts: &[String], budget: &WordBudget) -> String {
    let mut words: Vec<Vec<&str>> = parts
        .iter()
        .map(|p| p.split_whitespace().collect())
        .collect();
    let mut total: usize = words.iter().map(Vec::len).sum();

    while total > budget.max_words {
        let mut longest = 0;
        for (i, w) in words.iter().enumerate() {
            if w.len() > words[longest].len() {
                longest = i;
            }
        }
        if words[longest].len() <= budget.word_floor {
            break;
        }
        words[longest].pop();
        total -= 1;
    }

    words.into_iter().flatten().collect::<Vec<_>>().join(" ")
}

/// Build and compress the prompt for one request.
pub fn format_prompt(
    styles: &[String],
    emotions: &[String],
    bpm: TempoRange,
    instruments: &[String],
    chords: &[ChordTemplate],
    references: &[ReferenceTrack],
    budget: &WordBudget,
) -> String {
    let sections = build_sections(styles, emotions, bpm, instruments, chords, references);
    compress_sections(&sections, budget)
}
