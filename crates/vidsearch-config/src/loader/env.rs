//! Environment variable configuration overlay
//!
//! Supports environment variables in the format:
//! `VIDSEARCH_<section>_<field>=value`
//!
//! Examples:
//! - `VIDSEARCH_CHUNKING_TOKENS_PER_CHUNK=200`
//! - `VIDSEARCH_EMBEDDING_BACKEND=openai`
//! - `VIDSEARCH_PUNCTUATION_PARALLEL=true`

use crate::{error::ConfigError, types::*, Config, Result};
use std::env;
use std::path::PathBuf;

const PREFIX: &str = "VIDSEARCH_";

/// Parse configuration from environment variables
pub fn from_env() -> Result<Option<Config>> {
    let env_vars: Vec<(String, String)> = env::vars()
        .filter(|(k, _)| k.starts_with(PREFIX))
        .collect();

    if env_vars.is_empty() {
        return Ok(None);
    }

    Ok(Some(from_pairs(env_vars)))
}

/// Build an overlay from explicit key/value pairs; unparsable entries are skipped
pub fn from_pairs<I>(pairs: I) -> Config
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut config = Config::default();
    for (key, value) in pairs {
        if let Err(e) = apply_env_var(&mut config, &key, &value) {
            eprintln!("Warning: failed to parse {}: {}", key, e);
        }
    }
    config
}

fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let key = key.strip_prefix(PREFIX).unwrap_or(key);

    let Some((section, field)) = key.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: "Expected format: VIDSEARCH_<section>_<field>".to_string(),
        });
    };

    let section = section.to_lowercase();
    let field = field.to_lowercase();

    match section.as_str() {
        "core" => apply_core_var(&mut config.core, &field, value),
        "chunking" => apply_chunking_var(&mut config.chunking, &field, value),
        "punctuation" => apply_punctuation_var(&mut config.punctuation, &field, value),
        "embedding" => apply_embedding_var(&mut config.embedding, &field, value),
        "search" => apply_search_var(&mut config.search, &field, value),
        "youtube" => apply_youtube_var(&mut config.youtube, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn apply_core_var(config: &mut CoreConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "data_dir" => config.data_dir = PathBuf::from(value),
        "videos_file" => config.videos_file = PathBuf::from(value),
        _ => return Err(unknown_field("CORE", field)),
    }
    Ok(())
}

fn apply_chunking_var(config: &mut ChunkingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "tokens_per_chunk" => config.tokens_per_chunk = parse_usize("CHUNKING", field, value)?,
        "separator" => config.separator = value.to_string(),
        "abbreviations" => config.abbreviations = parse_list(value),
        _ => return Err(unknown_field("CHUNKING", field)),
    }
    Ok(())
}

fn apply_punctuation_var(config: &mut PunctuationConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "model" => config.model = value.to_string(),
        "endpoint" => config.endpoint = Some(value.to_string()),
        "api_key_env" => config.api_key_env = value.to_string(),
        "tokenizer_path" => config.tokenizer_path = Some(PathBuf::from(value)),
        "max_length" => config.max_length = parse_usize("PUNCTUATION", field, value)?,
        "reserved_tokens" => config.reserved_tokens = parse_usize("PUNCTUATION", field, value)?,
        "parallel" => config.parallel = parse_bool(value)?,
        _ => return Err(unknown_field("PUNCTUATION", field)),
    }
    Ok(())
}

fn apply_embedding_var(config: &mut EmbeddingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "backend" => {
            config.backend = match value.to_lowercase().as_str() {
                "openai" | "external" => EmbeddingBackend::External,
                "ollama" => EmbeddingBackend::Ollama,
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "embedding.backend",
                        value,
                        &["openai", "ollama"],
                    ))
                }
            };
        }
        "model_name" => config.model_name = value.to_string(),
        "tokenizer_path" => config.tokenizer_path = Some(PathBuf::from(value)),
        "max_length" => config.max_length = parse_usize("EMBEDDING", field, value)?,
        "batch_size" => config.batch_size = parse_usize("EMBEDDING", field, value)?,
        _ => return Err(unknown_field("EMBEDDING", field)),
    }
    Ok(())
}

fn apply_search_var(config: &mut SearchConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "top_k" => config.top_k = parse_usize("SEARCH", field, value)?,
        _ => return Err(unknown_field("SEARCH", field)),
    }
    Ok(())
}

fn apply_youtube_var(config: &mut YoutubeConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "languages" => config.languages = parse_list(value),
        "cache" => config.cache = parse_bool(value)?,
        _ => return Err(unknown_field("YOUTUBE", field)),
    }
    Ok(())
}

fn unknown_field(section: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: format!("{}{}_{}", PREFIX, section, field.to_uppercase()),
        message: format!("Unknown field: {}", field),
    }
}

fn parse_usize(section: &str, field: &str, value: &str) -> Result<usize> {
    value.parse().map_err(|_| ConfigError::EnvVarError {
        var: format!("{}{}_{}", PREFIX, section, field.to_uppercase()),
        message: format!("Invalid integer: {}", value),
    })
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::EnvVarError {
            var: "boolean".to_string(),
            message: format!("Invalid boolean: {}", value),
        }),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_sections_are_applied() {
        let config = from_pairs(pairs(&[
            ("VIDSEARCH_CHUNKING_TOKENS_PER_CHUNK", "200"),
            ("VIDSEARCH_EMBEDDING_BACKEND", "openai"),
            ("VIDSEARCH_PUNCTUATION_PARALLEL", "yes"),
            ("VIDSEARCH_PUNCTUATION_RESERVED_TOKENS", "3"),
            ("VIDSEARCH_YOUTUBE_LANGUAGES", "en, de"),
            ("VIDSEARCH_CORE_DATA_DIR", "/var/lib/vidsearch"),
        ]));
        assert_eq!(config.chunking.tokens_per_chunk, 200);
        assert_eq!(config.embedding.backend, EmbeddingBackend::External);
        assert!(config.punctuation.parallel);
        assert_eq!(config.punctuation.reserved_tokens, 3);
        assert_eq!(config.youtube.languages, vec!["en", "de"]);
        assert_eq!(config.core.data_dir, PathBuf::from("/var/lib/vidsearch"));
    }

    #[test]
    fn test_bad_values_are_skipped() {
        let config = from_pairs(pairs(&[
            ("VIDSEARCH_SEARCH_TOP_K", "lots"),
            ("VIDSEARCH_NOPE_FIELD", "1"),
        ]));
        assert_eq!(config.search.top_k, SearchConfig::default().top_k);
    }
}
