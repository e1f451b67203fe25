//! Transcript re-segmentation configuration

use serde::{Deserialize, Serialize};

/// Budgets for the sentence re-packing pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkingConfig {
    /// Maximum embedding-tokenizer tokens per final chunk
    ///
    /// Clamped to the embedding tokenizer's own ceiling at runtime.
    #[serde(default = "default_tokens_per_chunk")]
    pub tokens_per_chunk: usize,

    /// Separator used when packing sentences into windows
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Extra lowercase abbreviations (with trailing dot) that never end a sentence
    ///
    /// Added to the built-in list, e.g. `["approx.", "dept."]`.
    #[serde(default)]
    pub abbreviations: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            tokens_per_chunk: default_tokens_per_chunk(),
            separator: default_separator(),
            abbreviations: Vec::new(),
        }
    }
}

impl crate::validation::Validate for ChunkingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("chunking.tokens_per_chunk", self.tokens_per_chunk, 0)?;

        if let Some(bad) = self.abbreviations.iter().find(|a| !a.ends_with('.')) {
            return Err(ConfigError::validation(
                "chunking.abbreviations",
                format!("'{}' must end with a dot", bad),
            ));
        }
        Ok(())
    }
}

fn default_tokens_per_chunk() -> usize {
    150
}

fn default_separator() -> String {
    " ".to_string()
}
