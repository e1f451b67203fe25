//! Embedding provider configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Model name for the selected backend
    ///
    /// Examples:
    /// - Ollama: "all-minilm", "nomic-embed-text"
    /// - OpenAI: "text-embedding-3-small"
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Path to the embedding model's `tokenizer.json`
    #[serde(default)]
    pub tokenizer_path: Option<PathBuf>,

    /// Embedding model input ceiling in tokens
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Texts per embedding request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Embedding backend options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// OpenAI API (requires OPENAI_API_KEY)
    #[serde(rename = "openai")]
    External,

    /// Local Ollama server
    #[default]
    Ollama,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Ollama,
            model_name: default_model_name(),
            tokenizer_path: None,
            max_length: default_max_length(),
            batch_size: default_batch_size(),
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::validation::{validate_non_empty, validate_positive};

        validate_non_empty("embedding.model_name", &self.model_name)?;
        validate_positive("embedding.max_length", self.max_length, 0)?;
        validate_positive("embedding.batch_size", self.batch_size, 0)?;
        Ok(())
    }
}

fn default_model_name() -> String {
    "all-minilm".to_string()
}

fn default_max_length() -> usize {
    512
}

fn default_batch_size() -> usize {
    32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        assert!(EmbeddingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_model_name_invalid() {
        let config = EmbeddingConfig {
            model_name: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_serialization() {
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::External).unwrap(),
            "\"openai\""
        );
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::Ollama).unwrap(),
            "\"ollama\""
        );
    }
}
