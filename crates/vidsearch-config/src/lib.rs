//! Configuration management for vidsearch
//!
//! This crate provides a validated configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Config validation with helpful error messages
//! - Config merging (file + environment + explicit overrides)
//!
//! # Example
//!
//! ```no_run
//! use vidsearch_config::Config;
//!
//! // Load from default location (.vidsearch.{toml,yml,json})
//! let config = Config::load()?;
//!
//! // Or load from specific file
//! let config = Config::from_file("path/to/config.toml")?;
//!
//! let budget = config.chunking.tokens_per_chunk;
//! # Ok::<(), vidsearch_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, ErrorFormatter, Result};
pub use loader::ConfigBuilder;
pub use types::*;

pub use validation::Validate;
