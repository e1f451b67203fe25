use crate::traits::Tokenizer;
use anyhow::Result;
use text_splitter::{ChunkConfig, ChunkSizer, TextSplitter};
use tracing::warn;

/// Sizes text-splitter chunks with any [`Tokenizer`].
pub struct TokenizerSizer<'a> {
    pub tokenizer: &'a dyn Tokenizer,
}

impl ChunkSizer for TokenizerSizer<'_> {
    /// A chunk the tokenizer fails on never fits.
    fn size(&self, chunk: &str) -> usize {
        match self.tokenizer.count_tokens(chunk) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(tokenizer = self.tokenizer.name(), error = %e, "token count failed while splitting");
                usize::MAX
            }
        }
    }
}

/// Break every sentence whose own token count exceeds `budget` at semantic
/// boundaries, leaving the others untouched and in order.
pub fn split_oversized(
    sentences: Vec<String>,
    tokenizer: &dyn Tokenizer,
    budget: usize,
) -> Result<Vec<String>> {
    let mut out = Vec::with_capacity(sentences.len());
    for sentence in sentences {
        let tokens = tokenizer.count_tokens(&sentence)?;
        if tokens <= budget {
            out.push(sentence);
            continue;
        }

        warn!(
            tokenizer = tokenizer.name(),
            tokens, budget, "splitting oversized sentence"
        );
        let config = ChunkConfig::new(budget.max(1)).with_sizer(TokenizerSizer { tokenizer });
        let splitter = TextSplitter::new(config);
        out.extend(splitter.chunks(&sentence).map(str::to_string));
    }
    Ok(out)
}
