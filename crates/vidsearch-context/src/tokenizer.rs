use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tiktoken_rs::{cl100k_base, CoreBPE};
use tracing::{debug, info, warn};
use vidsearch_core::traits::Tokenizer;

/// Largest `model_max_length` taken at face value. Hugging Face writes a
/// huge sentinel when a model declares no limit.
const SANE_MAX_LENGTH: u64 = 1_000_000;

/// A Hugging Face `tokenizer.json` tokenizer.
pub struct HfTokenizer {
    name: String,
    inner: tokenizers::Tokenizer,
    max_length: usize,
}

impl HfTokenizer {
    /// Load `path`. The ceiling comes from a sibling `tokenizer_config.json`
    /// when it declares a usable `model_max_length`, else `fallback_max_length`.
    pub fn from_file(path: &Path, fallback_max_length: usize) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| anyhow!("failed to load tokenizer {}: {}", path.display(), e))?;
        let max_length = declared_max_length(path).unwrap_or(fallback_max_length);
        debug!(path = %path.display(), max_length, "loaded tokenizer");

        Ok(Self {
            name: path.display().to_string(),
            inner,
            max_length,
        })
    }
}

fn declared_max_length(tokenizer_path: &Path) -> Option<usize> {
    let config_path = tokenizer_path.with_file_name("tokenizer_config.json");
    let raw = fs::read_to_string(config_path).ok()?;
    let json: serde_json::Value = serde_json::from_str(&raw).ok()?;
    json.get("model_max_length")?
        .as_u64()
        .filter(|len| *len > 0 && *len <= SANE_MAX_LENGTH)
        .map(|len| len as usize)
}

impl Tokenizer for HfTokenizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn count_tokens(&self, text: &str) -> Result<usize> {
        self.inner
            .encode(text, false)
            .map(|encoding| encoding.len())
            .map_err(|e| anyhow!("tokenization failed: {}", e))
    }

    fn model_max_length(&self) -> usize {
        self.max_length
    }
}

/// `cl100k_base` BPE, for when no model tokenizer file is configured.
pub struct TiktokenTokenizer {
    bpe: CoreBPE,
    max_length: usize,
}

impl TiktokenTokenizer {
    pub fn new(max_length: usize) -> Result<Self> {
        let bpe = cl100k_base().map_err(|e| anyhow!("failed to load cl100k_base: {}", e))?;
        Ok(Self { bpe, max_length })
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn name(&self) -> &str {
        "cl100k_base"
    }

    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(self.bpe.encode_with_special_tokens(text).len())
    }

    fn model_max_length(&self) -> usize {
        self.max_length
    }
}

/// A tokenizer whose ceiling leaves `reserved` positions for the special
/// tokens a model adds around every input (`<s>`, `</s>`, ...).
pub struct ReservedTokenizer {
    inner: Arc<dyn Tokenizer>,
    reserved: usize,
}

impl ReservedTokenizer {
    pub fn new(inner: Arc<dyn Tokenizer>, reserved: usize) -> Self {
        Self { inner, reserved }
    }
}

impl Tokenizer for ReservedTokenizer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn count_tokens(&self, text: &str) -> Result<usize> {
        self.inner.count_tokens(text)
    }

    fn model_max_length(&self) -> usize {
        self.inner.model_max_length().saturating_sub(self.reserved).max(1)
    }
}

/// The punctuation model's tokenizer, with room kept for its special tokens.
pub fn load_punctuation_tokenizer(
    path: Option<&Path>,
    max_length: usize,
    reserved: usize,
) -> Result<Arc<dyn Tokenizer>> {
    if path.is_none() {
        warn!(
            max_length,
            reserved, "no punctuation tokenizer file configured; cl100k counts only approximate the model's"
        );
    }
    let tokenizer = load_tokenizer(path, max_length, "punctuation")?;
    Ok(Arc::new(ReservedTokenizer::new(tokenizer, reserved)))
}

/// Load the tokenizer at `path`, or `cl100k_base` when none is configured.
pub fn load_tokenizer(path: Option<&Path>, max_length: usize, role: &str) -> Result<Arc<dyn Tokenizer>> {
    match path {
        Some(path) => {
            let tokenizer = HfTokenizer::from_file(path, max_length)
                .with_context(|| format!("loading {} tokenizer", role))?;
            info!(role, tokenizer = tokenizer.name(), max_length = tokenizer.model_max_length(), "tokenizer ready");
            Ok(Arc::new(tokenizer))
        }
        None => {
            let tokenizer = TiktokenTokenizer::new(max_length)
                .with_context(|| format!("loading {} tokenizer", role))?;
            info!(role, tokenizer = "cl100k_base", max_length, "no tokenizer file configured; using tiktoken");
            Ok(Arc::new(tokenizer))
        }
    }
}
