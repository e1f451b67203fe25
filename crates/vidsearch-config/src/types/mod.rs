//! Configuration type definitions
//!
//! One module per concern. Each type carries its own defaults and validation.

pub mod chunking;
pub mod core;
pub mod embedding;
pub mod punctuation;
pub mod search;
pub mod youtube;

pub use chunking::ChunkingConfig;
pub use core::CoreConfig;
pub use embedding::{EmbeddingBackend, EmbeddingConfig};
pub use punctuation::PunctuationConfig;
pub use search::SearchConfig;
pub use youtube::YoutubeConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration, organized by functional area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data locations (store, index, transcript cache)
    #[serde(default)]
    pub core: CoreConfig,

    /// Transcript re-segmentation budgets
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Punctuation restoration model
    #[serde(default)]
    pub punctuation: PunctuationConfig,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub search: SearchConfig,

    /// Transcript fetching
    #[serde(default)]
    pub youtube: YoutubeConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.core.validate()?;
        self.chunking.validate()?;
        self.punctuation.validate()?;
        self.embedding.validate()?;
        self.search.validate()?;
        self.youtube.validate()?;
        Ok(())
    }
}
