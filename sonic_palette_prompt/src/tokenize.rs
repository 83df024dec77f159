// Tokenizer and keyword matching.
//
// The tokenizer is deliberately naive: lowercase, then ASCII letter runs
// become tokens, each CJK Unified Ideograph becomes its own token, and
// everything else (digits, punctuation, whitespace, other scripts) only
// separates. Style and emotion keywords are mostly low-frequency content
// words or short CJK words, so no stemming or stop-word handling is done.

use crate::config::KeywordMatch;

/// True for characters in the CJK Unified Ideographs block (U+4E00..=U+9FFF).
pub fn is_cjk(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&ch)
}

/// Split text into lowercase ASCII-word tokens and single CJK characters,
/// preserving input order.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_lowercase() {
            word.push(ch);
            continue;
        }
        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
        if is_cjk(ch) {
            tokens.push(ch.to_string());
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

/// Whether `keyword` occurs in the token stream.
///
/// ASCII keywords are case-folded; other keywords are compared verbatim.
/// Under `KeywordMatch::Phrase` a keyword that tokenizes into several tokens
/// also matches a consecutive run of those tokens.
pub fn keyword_hit(tokens: &[String], keyword: &str, mode: KeywordMatch) -> bool {
    let hit = if keyword.is_ascii() {
        let folded = keyword.to_ascii_lowercase();
        tokens.iter().any(|t| *t == folded)
    } else {
        tokens.iter().any(|t| t == keyword)
    };
    if hit || mode == KeywordMatch::Exact {
        return hit;
    }

    let phrase = tokenize(keyword);
    phrase.len() >= 2 && tokens.windows(phrase.len()).any(|w| w == phrase.as_slice())
}
