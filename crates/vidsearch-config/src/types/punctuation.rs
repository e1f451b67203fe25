//! Punctuation restoration model configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PunctuationConfig {
    /// Token-classification model that predicts trailing punctuation
    #[serde(default = "default_model")]
    pub model: String,

    /// HTTP endpoint serving the model
    ///
    /// Defaults to the hosted inference URL for `model`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Environment variable holding the bearer token for `endpoint`
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Path to the model's `tokenizer.json`
    ///
    /// When unset, a cl100k BPE tokenizer approximates token counts.
    #[serde(default)]
    pub tokenizer_path: Option<PathBuf>,

    /// Model input ceiling in tokens
    ///
    /// Overridden by `model_max_length` from a sibling `tokenizer_config.json`.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Tokens held back from `max_length` for the special tokens the model
    /// wraps every input in
    #[serde(default = "default_reserved_tokens")]
    pub reserved_tokens: usize,

    /// Punctuate packed windows in parallel
    #[serde(default)]
    pub parallel: bool,
}

impl PunctuationConfig {
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://api-inference.huggingface.co/models/{}",
                self.model
            )
        })
    }
}

impl Default for PunctuationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            tokenizer_path: None,
            max_length: default_max_length(),
            reserved_tokens: default_reserved_tokens(),
            parallel: false,
        }
    }
}

impl crate::validation::Validate for PunctuationConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::validation::{validate_non_empty, validate_positive};

        validate_non_empty("punctuation.model", &self.model)?;
        validate_positive("punctuation.max_length", self.max_length, 0)?;
        if self.reserved_tokens >= self.max_length {
            return Err(crate::error::ConfigError::ValidationError {
                field: "punctuation.reserved_tokens".to_string(),
                message: format!(
                    "must be below max_length ({}), got {}",
                    self.max_length, self.reserved_tokens
                ),
            });
        }
        if let Some(endpoint) = &self.endpoint {
            validate_non_empty("punctuation.endpoint", endpoint)?;
        }
        Ok(())
    }
}

fn default_model() -> String {
    "oliverguhr/fullstop-punctuation-multilang-large".to_string()
}

fn default_api_key_env() -> String {
    "HF_API_TOKEN".to_string()
}

fn default_max_length() -> usize {
    512
}

fn default_reserved_tokens() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        assert!(PunctuationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_endpoint_defaults_to_hosted_model() {
        let config = PunctuationConfig::default();
        assert_eq!(
            config.resolved_endpoint(),
            "https://api-inference.huggingface.co/models/oliverguhr/fullstop-punctuation-multilang-large"
        );
    }

    #[test]
    fn test_explicit_endpoint_wins() {
        let config = PunctuationConfig {
            endpoint: Some("http://localhost:8080/punctuate".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_endpoint(), "http://localhost:8080/punctuate");
    }

    #[test]
    fn test_zero_max_length_invalid() {
        let config = PunctuationConfig {
            max_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reserve_must_leave_room() {
        let config = PunctuationConfig {
            max_length: 2,
            reserved_tokens: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(PunctuationConfig::default().reserved_tokens, 2);
    }
}
