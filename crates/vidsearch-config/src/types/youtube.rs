//! Transcript fetching configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YoutubeConfig {
    /// Transcript languages to try, in order
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Keep fetched transcripts on disk and reuse them
    #[serde(default = "default_cache")]
    pub cache: bool,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            cache: default_cache(),
        }
    }
}

impl crate::validation::Validate for YoutubeConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.languages.is_empty() {
            return Err(ConfigError::validation(
                "youtube.languages",
                "Must list at least one transcript language",
            ));
        }
        if self.languages.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::validation(
                "youtube.languages",
                "Language codes cannot be empty strings",
            ));
        }
        Ok(())
    }
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_cache() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        assert!(YoutubeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_no_languages_invalid() {
        let config = YoutubeConfig {
            languages: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
