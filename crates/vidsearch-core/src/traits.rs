use crate::models::{Chunk, Transcript};
use anyhow::Result;
use async_trait::async_trait;

/// Token counting for one model vocabulary.
pub trait Tokenizer: Send + Sync {
    /// Human-readable identifier used in logs.
    fn name(&self) -> &str;

    /// Number of tokens `text` encodes to, special tokens excluded.
    fn count_tokens(&self, text: &str) -> Result<usize>;

    /// Longest input the model accepts.
    fn model_max_length(&self) -> usize;
}

/// One word of punctuation-model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledToken {
    pub word: String,
    pub label: String,
}

impl LabeledToken {
    pub fn new(word: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            label: label.into(),
        }
    }
}

/// Token classifier predicting the punctuation mark that follows each word.
pub trait PunctuationLabeler: Send + Sync {
    fn label(&self, text: &str) -> Result<Vec<LabeledToken>>;
}

/// Sentence boundary detection.
pub trait SentenceSplitter: Send + Sync {
    fn split(&self, text: &str) -> Vec<String>;
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Turns a fetched transcript into timed, embeddable chunks.
pub trait TranscriptChunker: Send + Sync {
    fn split_into_chunks(&self, transcript: &Transcript) -> Result<Vec<Chunk>>;
}
