use crate::embedder::select_embedder;
use crate::punctuator::HttpPunctuationLabeler;
use crate::tokenizer::{load_punctuation_tokenizer, load_tokenizer};
use anyhow::{Context, Result};
use std::sync::Arc;
use vidsearch_config::Config;
use vidsearch_core::chunking::UnicodeSentenceSplitter;
use vidsearch_core::traits::{Embedder, PunctuationLabeler, SentenceSplitter, Tokenizer};
use vidsearch_core::TranscriptSegmenter;

/// Every model and tokenizer handle the application uses, built once.
#[derive(Clone)]
pub struct Capabilities {
    pub punctuation_tokenizer: Arc<dyn Tokenizer>,
    pub embedding_tokenizer: Arc<dyn Tokenizer>,
    pub punctuation_labeler: Arc<dyn PunctuationLabeler>,
    pub sentence_splitter: Arc<dyn SentenceSplitter>,
    pub embedder: Arc<dyn Embedder>,
}

impl Capabilities {
    /// Must be called inside a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        let punctuation_tokenizer = load_punctuation_tokenizer(
            config.punctuation.tokenizer_path.as_deref(),
            config.punctuation.max_length,
            config.punctuation.reserved_tokens,
        )?;
        let embedding_tokenizer = load_tokenizer(
            config.embedding.tokenizer_path.as_deref(),
            config.embedding.max_length,
            "embedding",
        )?;
        let punctuation_labeler = HttpPunctuationLabeler::from_config(&config.punctuation)
            .context("building punctuation labeler")?;
        let sentence_splitter =
            UnicodeSentenceSplitter::new().with_abbreviations(&config.chunking.abbreviations);
        let embedder = select_embedder(&config.embedding)?;

        Ok(Self {
            punctuation_tokenizer,
            embedding_tokenizer,
            punctuation_labeler: Arc::new(punctuation_labeler),
            sentence_splitter: Arc::new(sentence_splitter),
            embedder,
        })
    }

    /// The segmentation pipeline configured from `config`.
    pub fn segmenter(&self, config: &Config) -> TranscriptSegmenter {
        TranscriptSegmenter::new(
            self.punctuation_tokenizer.clone(),
            self.embedding_tokenizer.clone(),
            self.punctuation_labeler.clone(),
            self.sentence_splitter.clone(),
            config.chunking.tokens_per_chunk,
        )
        .with_separator(config.chunking.separator.clone())
        .with_parallel(config.punctuation.parallel)
    }
}
