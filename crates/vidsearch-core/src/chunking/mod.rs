//! Building blocks of transcript segmentation.

pub mod align;
pub mod packer;
pub mod punctuation;
pub mod sentence;
pub mod sizer;

pub use align::realign;
pub use packer::{effective_budget, pack, pack_chunks, pack_texts, Packable};
pub use punctuation::{assemble, restore_punctuation, PunctuationMark};
pub use sentence::UnicodeSentenceSplitter;
pub use sizer::{split_oversized, TokenizerSizer};
