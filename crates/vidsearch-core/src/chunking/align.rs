use crate::models::Chunk;
use crate::traits::Tokenizer;
use anyhow::{bail, Result};
use tracing::warn;

/// Attach timing to re-packed text windows.
///
/// A running total of `tokenizer` counts over the windows, divided by the
/// tokenizer's ceiling, selects which of the `merged` punctuation-pass
/// chunks each window inherits its interval from. The index is clamped to
/// the last merged chunk. The mapping is proportional, not exact.
pub fn realign(windows: Vec<String>, merged: &[Chunk], tokenizer: &dyn Tokenizer) -> Result<Vec<Chunk>> {
    if merged.is_empty() {
        bail!("cannot realign {} windows against zero merged chunks", windows.len());
    }
    let ceiling = tokenizer.model_max_length().max(1);
    let last = merged.len() - 1;

    let mut total = 0usize;
    let mut aligned = Vec::with_capacity(windows.len());
    for window in windows {
        total += tokenizer.count_tokens(&window)?;
        let mut idx = total / ceiling;
        if idx > last {
            warn!(index = idx, last, "realignment index out of range; clamping");
            idx = last;
        }
        aligned.push(merged[idx].with_text(window));
    }
    Ok(aligned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChunkMetadata;

    struct WordTokenizer {
        max: usize,
    }

    impl Tokenizer for WordTokenizer {
        fn name(&self) -> &str {
            "words"
        }

        fn count_tokens(&self, text: &str) -> Result<usize> {
            Ok(text.split_whitespace().count())
        }

        fn model_max_length(&self) -> usize {
            self.max
        }
    }

    fn merged() -> Vec<Chunk> {
        vec![
            Chunk::new("a", ChunkMetadata::new(0.0, 10.0).unwrap()),
            Chunk::new("b", ChunkMetadata::new(10.0, 10.0).unwrap()),
        ]
    }

    fn words(n: usize) -> String {
        vec!["w"; n].join(" ")
    }

    #[test]
    fn test_windows_map_by_cumulative_tokens() {
        let tok = WordTokenizer { max: 4 };
        let out = realign(vec![words(2), words(3), words(2)], &merged(), &tok).unwrap();

        // running totals 2, 5, 7 -> indices 0, 1, 1
        assert_eq!(out[0].metadata.start_time(), Some(0.0));
        assert_eq!(out[1].metadata.start_time(), Some(10.0));
        assert_eq!(out[2].metadata.start_time(), Some(10.0));
        assert_eq!(out[2].text, words(2));
    }

    #[test]
    fn test_out_of_range_index_is_clamped() {
        let tok = WordTokenizer { max: 2 };
        let out = realign(vec![words(9)], &merged(), &tok).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].metadata.end_time(), 20.0);
    }

    #[test]
    fn test_source_chunks_are_not_modified() {
        let tok = WordTokenizer { max: 100 };
        let source = merged();
        let out = realign(vec!["new text".to_string()], &source, &tok).unwrap();
        assert_eq!(out[0].text, "new text");
        assert_eq!(source[0].text, "a");
    }

    #[test]
    fn test_empty_merged_is_an_error() {
        let tok = WordTokenizer { max: 10 };
        assert!(realign(vec!["x".to_string()], &[], &tok).is_err());
    }
}
