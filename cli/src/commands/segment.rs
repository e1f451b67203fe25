use anyhow::{Context, Result};
use std::path::Path;
use vidsearch_config::Config;
use vidsearch_context::Capabilities;
use vidsearch_core::Transcript;

use super::ui;

pub async fn handle_segment(path: &Path, max_tokens: Option<usize>, config: &Config) -> Result<()> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let transcript: Transcript = serde_json::from_slice(&raw)
        .with_context(|| format!("{} is not a transcript file", path.display()))?;

    let mut config = config.clone();
    if let Some(max_tokens) = max_tokens {
        config.chunking.tokens_per_chunk = max_tokens;
    }
    let capabilities = Capabilities::from_config(&config)?;
    let segmenter = capabilities.segmenter(&config);

    let snippets = transcript.snippets.len();
    let chunks = tokio::task::spawn_blocking(move || segmenter.segment(&transcript.snippets))
        .await
        .context("segmentation task panicked")??;

    ui::print_header(&format!("{} snippets -> {} chunks", snippets, chunks.len()));
    for (i, chunk) in chunks.iter().enumerate() {
        ui::print_key_value(&format!("#{} {}", i, chunk.metadata), &chunk.text);
    }
    Ok(())
}
