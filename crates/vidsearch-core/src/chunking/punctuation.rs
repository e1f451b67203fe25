//! Reassembly of punctuation-model output into prose.

use crate::traits::{LabeledToken, PunctuationLabeler};
use anyhow::Result;
use std::str::FromStr;

/// Marks the punctuation model predicts after a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunctuationMark {
    Period,
    Comma,
    Exclamation,
    Question,
    Semicolon,
    Colon,
}

impl PunctuationMark {
    pub fn as_char(self) -> char {
        match self {
            PunctuationMark::Period => '.',
            PunctuationMark::Comma => ',',
            PunctuationMark::Exclamation => '!',
            PunctuationMark::Question => '?',
            PunctuationMark::Semicolon => ';',
            PunctuationMark::Colon => ':',
        }
    }
}

impl FromStr for PunctuationMark {
    type Err = ();

    fn from_str(label: &str) -> std::result::Result<Self, Self::Err> {
        match label.trim() {
            "." => Ok(PunctuationMark::Period),
            "," => Ok(PunctuationMark::Comma),
            "!" => Ok(PunctuationMark::Exclamation),
            "?" => Ok(PunctuationMark::Question),
            ";" => Ok(PunctuationMark::Semicolon),
            ":" => Ok(PunctuationMark::Colon),
            _ => Err(()),
        }
    }
}

fn is_punctuation_only(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_punctuation())
}

/// Build punctuated text from labeled tokens.
///
/// A punctuation label strips trailing whitespace from the text built so far
/// and appends the word followed directly by its mark. Any other label
/// appends a space and the word. Surface forms that are themselves
/// punctuation attach to the preceding word.
pub fn assemble(tokens: &[LabeledToken]) -> String {
    let mut text = String::new();
    for token in tokens {
        let word = token.word.trim();
        let mark = token.label.parse::<PunctuationMark>().ok();

        if mark.is_some() {
            let kept = text.trim_end().len();
            text.truncate(kept);
        }
        if is_punctuation_only(word) {
            let kept = text.trim_end().len();
            text.truncate(kept);
        } else if !word.is_empty() {
            text.push(' ');
        }
        text.push_str(word);

        if let Some(mark) = mark {
            if !word.ends_with(mark.as_char()) {
                text.push(mark.as_char());
            }
        }
    }
    text.trim().to_string()
}

/// Lowercase `text`, label it, and reassemble the punctuated result.
pub fn restore_punctuation(labeler: &dyn PunctuationLabeler, text: &str) -> Result<String> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return Ok(String::new());
    }
    let tokens = labeler.label(&lowered)?;
    Ok(assemble(&tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn tok(word: &str, label: &str) -> LabeledToken {
        LabeledToken::new(word, label)
    }

    struct RecordingLabeler {
        seen: Mutex<Vec<String>>,
    }

    impl PunctuationLabeler for RecordingLabeler {
        fn label(&self, text: &str) -> Result<Vec<LabeledToken>> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(text.split_whitespace().map(|w| tok(w, "0")).collect())
        }
    }

    #[test]
    fn test_parse_marks() {
        assert_eq!(".".parse::<PunctuationMark>(), Ok(PunctuationMark::Period));
        assert_eq!("?".parse::<PunctuationMark>(), Ok(PunctuationMark::Question));
        assert!("0".parse::<PunctuationMark>().is_err());
        assert!("O".parse::<PunctuationMark>().is_err());
    }

    #[test]
    fn test_separate_mark_token_has_no_leading_space() {
        let tokens = [tok("hello", "O"), tok("world", "O"), tok(".", ".")];
        assert_eq!(assemble(&tokens), "hello world.");
    }

    #[test]
    fn test_labeled_word_gets_trailing_mark() {
        let tokens = [
            tok("hello", "0"),
            tok("world", "."),
            tok("how", "0"),
            tok("are", "0"),
            tok("you", "?"),
        ];
        assert_eq!(assemble(&tokens), "hello world. how are you?");
    }

    #[test]
    fn test_mark_is_not_doubled() {
        let tokens = [tok("ok", "0"), tok("fine.", ".")];
        assert_eq!(assemble(&tokens), "ok fine.");
    }

    #[test]
    fn test_comma_and_colon() {
        let tokens = [tok("well", ","), tok("note", ":"), tok("done", ".")];
        assert_eq!(assemble(&tokens), "well, note: done.");
    }

    #[test]
    fn test_no_tokens_yields_empty_text() {
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn test_restore_lowercases_before_labeling() {
        let labeler = RecordingLabeler {
            seen: Mutex::new(Vec::new()),
        };
        let out = restore_punctuation(&labeler, "Hello World").unwrap();
        assert_eq!(out, "hello world");
        assert_eq!(labeler.seen.lock().unwrap().as_slice(), ["hello world"]);
    }

    #[test]
    fn test_restore_skips_model_for_blank_text() {
        let labeler = RecordingLabeler {
            seen: Mutex::new(Vec::new()),
        };
        assert_eq!(restore_punctuation(&labeler, "   ").unwrap(), "");
        assert!(labeler.seen.lock().unwrap().is_empty());
    }
}
