//! TOML format parser

use crate::{error::ConfigError, Config, Result};

pub fn parse(content: &str) -> Result<Config> {
    parse_with_path(content, None)
}

/// Parse configuration from TOML string with file path for better errors
pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<Config> {
    ::toml::from_str(content).map_err(|e| ConfigError::from_toml_error(e, content, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
[punctuation]
max_length = 256
parallel = true

[search]
top_k = 7
"#;
        let config = parse(toml).unwrap();
        assert_eq!(config.punctuation.max_length, 256);
        assert!(config.punctuation.parallel);
        assert_eq!(config.search.top_k, 7);
    }

    #[test]
    fn test_parse_error_has_context() {
        let err = parse("[search]\ntop_k = \"many\"\n").unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }
}
