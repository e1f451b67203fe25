pub mod chunking;
pub mod error;
pub mod models;
pub mod segmenter;
pub mod traits;

pub use error::ChunkError;
pub use models::{Chunk, ChunkMetadata, Snippet, Transcript};
pub use segmenter::{segment_transcript, TranscriptSegmenter};
