//! Search configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Number of nearest chunks to return
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl crate::validation::Validate for SearchConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.top_k == 0 {
            return Err(ConfigError::InvalidInteger {
                field: "search.top_k".to_string(),
                value: self.top_k,
                min: 0,
            });
        }

        if self.top_k > 1000 {
            return Err(ConfigError::validation(
                "search.top_k",
                format!("top_k too large ({}), consider using <= 1000", self.top_k),
            ));
        }

        Ok(())
    }
}

fn default_top_k() -> usize {
    5
}
