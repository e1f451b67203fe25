//! Validation trait and helpers for configuration types

use crate::error::{ConfigError, Result};

/// Trait for validating configuration values
///
/// Implemented by every config section. Validation runs after all sources
/// have been merged, so a section sees its final values.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Check that an integer is strictly above `min`
pub fn validate_positive(field: impl Into<String>, value: usize, min: usize) -> Result<()> {
    if value <= min {
        return Err(ConfigError::InvalidInteger {
            field: field.into(),
            value,
            min,
        });
    }
    Ok(())
}

/// Check that a string field is not blank
pub fn validate_non_empty(field: impl Into<String>, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(field, "cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_valid() {
        assert!(validate_positive("test", 5, 0).is_ok());
    }

    #[test]
    fn test_positive_invalid() {
        assert!(validate_positive("test", 0, 0).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(validate_non_empty("name", "all-minilm").is_ok());
        assert!(validate_non_empty("name", "   ").is_err());
    }
}
