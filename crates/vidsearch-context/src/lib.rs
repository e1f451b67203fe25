pub mod capabilities;
pub mod embedder;
pub mod punctuator;
pub mod tokenizer;

pub use capabilities::Capabilities;
pub use embedder::{select_embedder, ExternalEmbedder, OllamaEmbedder};
pub use punctuator::HttpPunctuationLabeler;
pub use tokenizer::{
    load_punctuation_tokenizer, load_tokenizer, HfTokenizer, ReservedTokenizer, TiktokenTokenizer,
};
