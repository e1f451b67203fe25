//! Sentence boundary detection over punctuated, lowercased transcript text.
//!
//! Restored transcripts are lowercase, so the UAX #29 sentence rules (which
//! refuse to break before a lowercase letter) under-split them. Boundaries
//! are found on UAX #29 *word* segments instead: a terminal mark followed by
//! whitespace ends a sentence unless the word before it is a known
//! abbreviation or part of a run of single-letter initials. Decimals like
//! `3.5` are one word segment and never split.

use crate::traits::SentenceSplitter;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "e.g", "i.e", "etc", "approx", "a.m",
    "p.m", "inc", "ltd", "co", "u.s", "u.k", "jan", "feb", "mar", "apr", "jun", "jul", "aug",
    "sep", "sept", "oct", "nov", "dec",
];

/// Abbreviations that only hold before a number, as in `no. 5` or `fig. 2`.
/// Elsewhere they are ordinary words that can end a sentence.
const NUMERIC_ABBREVIATIONS: &[&str] = &["no", "nos", "fig", "figs", "vol", "ch", "pp", "eq"];

/// Single letters that are words in their own right, not initials.
const STANDALONE_LETTERS: &[&str] = &["a", "i"];

#[derive(Debug, Clone)]
pub struct UnicodeSentenceSplitter {
    abbreviations: HashSet<String>,
}

impl Default for UnicodeSentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl UnicodeSentenceSplitter {
    pub fn new() -> Self {
        Self {
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Add abbreviations, case-insensitive, with or without the trailing dot.
    pub fn with_abbreviations<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for abbr in extra {
            let normalized = abbr.as_ref().trim().trim_end_matches('.').to_lowercase();
            if !normalized.is_empty() {
                self.abbreviations.insert(normalized);
            }
        }
        self
    }

    /// Whether the `.` at `pieces[dot]`, following `word`, belongs to the word
    /// rather than ending the sentence.
    fn holds_dot(&self, pieces: &[(usize, &str)], dot: usize, word: &str, after_initial: bool) -> bool {
        let lowered = word.to_lowercase();
        if self.abbreviations.contains(&lowered) {
            return true;
        }
        let next = next_word(pieces, dot);
        if NUMERIC_ABBREVIATIONS.contains(&lowered.as_str()) {
            return next.is_some_and(|i| pieces[i].1.starts_with(|c: char| c.is_ascii_digit()));
        }
        if !is_initial(&lowered) {
            return false;
        }
        // "j. r. r. tolkien": an initial holds when it continues or starts a run.
        after_initial
            || next.is_some_and(|i| {
                is_initial(&pieces[i].1.to_lowercase())
                    && pieces.get(i + 1).is_some_and(|(_, p)| *p == ".")
            })
    }
}

fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_alphabetic() && !STANDALONE_LETTERS.contains(&word),
        _ => false,
    }
}

/// Index of the first non-whitespace piece after `from`.
fn next_word(pieces: &[(usize, &str)], from: usize) -> Option<usize> {
    (from + 1..pieces.len()).find(|&i| !pieces[i].1.trim().is_empty())
}

fn is_terminal(piece: &str) -> bool {
    matches!(piece, "." | "!" | "?" | "…")
}

fn is_closing(piece: &str) -> bool {
    matches!(piece, "\"" | "'" | ")" | "]" | "”" | "’" | "»")
}

fn is_word(piece: &str) -> bool {
    piece.chars().any(char::is_alphanumeric)
}

impl SentenceSplitter for UnicodeSentenceSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let pieces: Vec<(usize, &str)> = text.split_word_bound_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut last_word: Option<&str> = None;
        let mut terminated = false;
        let mut held_initial = false;
        let mut after_initial = false;

        for (pos, &(idx, piece)) in pieces.iter().enumerate() {
            if piece.trim().is_empty() {
                if terminated {
                    let sentence = text[start..idx].trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence.to_string());
                    }
                    start = idx;
                    terminated = false;
                }
                continue;
            }

            if is_terminal(piece) {
                let held = piece == "."
                    && !terminated
                    && last_word.is_some_and(|w| self.holds_dot(&pieces, pos, w, after_initial));
                held_initial = held && last_word.is_some_and(|w| is_initial(&w.to_lowercase()));
                terminated = terminated || !held;
            } else if is_closing(piece) {
                // quotes and brackets stay with the sentence they close
            } else {
                terminated = false;
                if is_word(piece) {
                    after_initial = held_initial;
                    last_word = Some(piece);
                } else {
                    after_initial = false;
                    last_word = None;
                }
                held_initial = false;
            }
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }
        sentences
    }
}
