//! End-to-end transcript segmentation: snippets in, timed embeddable chunks out.

use crate::chunking::{
    effective_budget, pack_chunks, pack_texts, realign, restore_punctuation, split_oversized,
};
use crate::models::{Chunk, Snippet, Transcript};
use crate::traits::{PunctuationLabeler, SentenceSplitter, Tokenizer, TranscriptChunker};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_SEPARATOR: &str = " ";

/// Segment `snippets` with the default separator, punctuating serially.
///
/// `max_tokens` bounds the embedding windows and is clamped to the
/// embedding tokenizer's ceiling; `None` uses the ceiling itself.
pub fn segment_transcript(
    snippets: &[Snippet],
    punctuation_tokenizer: &dyn Tokenizer,
    embedding_tokenizer: &dyn Tokenizer,
    punctuation_labeler: &dyn PunctuationLabeler,
    sentence_splitter: &dyn SentenceSplitter,
    max_tokens: Option<usize>,
) -> Result<Vec<Chunk>> {
    let stages = Stages {
        punctuation_tokenizer,
        embedding_tokenizer,
        punctuation_labeler,
        sentence_splitter,
        separator: DEFAULT_SEPARATOR,
        parallel: false,
    };
    stages.run(snippets, max_tokens)
}

struct Stages<'a> {
    punctuation_tokenizer: &'a dyn Tokenizer,
    embedding_tokenizer: &'a dyn Tokenizer,
    punctuation_labeler: &'a dyn PunctuationLabeler,
    sentence_splitter: &'a dyn SentenceSplitter,
    separator: &'a str,
    parallel: bool,
}

impl Stages<'_> {
    fn run(&self, snippets: &[Snippet], max_tokens: Option<usize>) -> Result<Vec<Chunk>> {
        let chunks = snippets
            .iter()
            .enumerate()
            .map(|(i, snippet)| {
                snippet
                    .to_chunk()
                    .with_context(|| format!("snippet {} has invalid timing", i))
            })
            .collect::<Result<Vec<_>>>()?;

        // the punctuation pass always joins snippets with a single space
        let merged = pack_chunks(chunks, self.punctuation_tokenizer, None, DEFAULT_SEPARATOR)
            .context("packing snippets for punctuation")?;
        debug!(snippets = snippets.len(), windows = merged.len(), "merged for punctuation");

        let punctuated = self.punctuate(&merged)?;
        let full_text = punctuated.join(" ");

        let sentences = self.sentence_splitter.split(&full_text);
        debug!(sentences = sentences.len(), "split into sentences");

        let budget = effective_budget(self.embedding_tokenizer, max_tokens);
        let sentences = split_oversized(sentences, self.embedding_tokenizer, budget)?;
        let windows = pack_texts(sentences, self.embedding_tokenizer, Some(budget), self.separator)
            .context("packing sentences for embedding")?;

        let aligned = realign(windows, &merged, self.punctuation_tokenizer)?;
        debug!(chunks = aligned.len(), budget, "segmented transcript");
        Ok(aligned)
    }

    fn punctuate(&self, merged: &[Chunk]) -> Result<Vec<String>> {
        let restore = |chunk: &Chunk| {
            restore_punctuation(self.punctuation_labeler, &chunk.text)
                .context("restoring punctuation")
        };
        if self.parallel {
            merged.par_iter().map(restore).collect()
        } else {
            merged.iter().map(restore).collect()
        }
    }
}

/// The segmentation pipeline bound to its capabilities.
#[derive(Clone)]
pub struct TranscriptSegmenter {
    punctuation_tokenizer: Arc<dyn Tokenizer>,
    embedding_tokenizer: Arc<dyn Tokenizer>,
    punctuation_labeler: Arc<dyn PunctuationLabeler>,
    sentence_splitter: Arc<dyn SentenceSplitter>,
    tokens_per_chunk: usize,
    separator: String,
    parallel: bool,
}

impl TranscriptSegmenter {
    pub fn new(
        punctuation_tokenizer: Arc<dyn Tokenizer>,
        embedding_tokenizer: Arc<dyn Tokenizer>,
        punctuation_labeler: Arc<dyn PunctuationLabeler>,
        sentence_splitter: Arc<dyn SentenceSplitter>,
        tokens_per_chunk: usize,
    ) -> Self {
        Self {
            punctuation_tokenizer,
            embedding_tokenizer,
            punctuation_labeler,
            sentence_splitter,
            tokens_per_chunk,
            separator: DEFAULT_SEPARATOR.to_string(),
            parallel: false,
        }
    }

    /// Separator between sentences packed into an embedding window.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Punctuate merged windows on the rayon pool. Output order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn tokens_per_chunk(&self) -> usize {
        self.tokens_per_chunk
    }

    pub fn segment(&self, snippets: &[Snippet]) -> Result<Vec<Chunk>> {
        let stages = Stages {
            punctuation_tokenizer: self.punctuation_tokenizer.as_ref(),
            embedding_tokenizer: self.embedding_tokenizer.as_ref(),
            punctuation_labeler: self.punctuation_labeler.as_ref(),
            sentence_splitter: self.sentence_splitter.as_ref(),
            separator: &self.separator,
            parallel: self.parallel,
        };
        stages.run(snippets, Some(self.tokens_per_chunk))
    }
}

impl TranscriptChunker for TranscriptSegmenter {
    fn split_into_chunks(&self, transcript: &Transcript) -> Result<Vec<Chunk>> {
        self.segment(&transcript.snippets)
            .with_context(|| format!("segmenting transcript of {}", transcript.video_id))
    }
}
