//! Greedy, tokenizer-bounded packing of ordered items into windows.

use crate::models::Chunk;
use crate::traits::Tokenizer;
use anyhow::Result;
use tracing::{debug, warn};

/// An item that can be folded into a packing window.
pub trait Packable: Sized {
    /// The empty accumulator a window starts from.
    fn seed() -> Self;

    fn text(&self) -> &str;

    /// The window that results from appending `next` to `self`.
    fn absorb(&self, next: &Self, separator: &str) -> Self;

    /// Final touch applied when a window is emitted.
    fn finish(self) -> Self {
        self
    }
}

impl Packable for Chunk {
    fn seed() -> Self {
        Chunk::empty()
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn absorb(&self, next: &Self, separator: &str) -> Self {
        self.merge_with(next, separator)
    }
}

impl Packable for String {
    fn seed() -> Self {
        String::new()
    }

    fn text(&self) -> &str {
        self
    }

    fn absorb(&self, next: &Self, separator: &str) -> Self {
        if self.is_empty() {
            next.clone()
        } else {
            format!("{}{}{}", self, separator, next)
        }
    }

    fn finish(self) -> Self {
        self.trim().to_string()
    }
}

/// The token budget actually applied: `max_tokens` (or the tokenizer's own
/// ceiling when absent), never above the tokenizer's ceiling.
pub fn effective_budget(tokenizer: &dyn Tokenizer, max_tokens: Option<usize>) -> usize {
    let ceiling = tokenizer.model_max_length();
    max_tokens.map_or(ceiling, |requested| requested.min(ceiling))
}

/// Greedily pack `items` left to right into windows of at most the
/// effective budget.
///
/// Each candidate window is re-tokenized as a whole; token counts are not
/// additive under concatenation. An item that alone exceeds the budget
/// becomes its own window. The trailing accumulator is always emitted, so
/// an empty input yields exactly one empty window.
pub fn pack<T, I>(
    items: I,
    tokenizer: &dyn Tokenizer,
    max_tokens: Option<usize>,
    separator: &str,
) -> Result<Vec<T>>
where
    T: Packable,
    I: IntoIterator<Item = T>,
{
    let budget = effective_budget(tokenizer, max_tokens);
    let mut windows = Vec::new();
    let mut current = T::seed();
    let mut seen = 0usize;

    for item in items {
        seen += 1;
        let candidate = current.absorb(&item, separator);
        if tokenizer.count_tokens(candidate.text())? <= budget {
            current = candidate;
            continue;
        }

        if !current.text().is_empty() {
            windows.push(current.finish());
        }
        current = T::seed().absorb(&item, separator);

        let alone = tokenizer.count_tokens(current.text())?;
        if alone > budget {
            warn!(
                tokenizer = tokenizer.name(),
                tokens = alone,
                budget,
                "item exceeds token budget on its own; emitting it unsplit"
            );
        }
    }
    windows.push(current.finish());

    debug!(
        tokenizer = tokenizer.name(),
        items = seen,
        windows = windows.len(),
        budget,
        "packed items"
    );
    Ok(windows)
}

/// Pack timed chunks; merged windows span their members' timing.
pub fn pack_chunks(
    chunks: Vec<Chunk>,
    tokenizer: &dyn Tokenizer,
    max_tokens: Option<usize>,
    separator: &str,
) -> Result<Vec<Chunk>> {
    pack(chunks, tokenizer, max_tokens, separator)
}

/// Pack plain strings; windows are trimmed.
pub fn pack_texts(
    texts: Vec<String>,
    tokenizer: &dyn Tokenizer,
    max_tokens: Option<usize>,
    separator: &str,
) -> Result<Vec<String>> {
    pack(texts, tokenizer, max_tokens, separator)
}
