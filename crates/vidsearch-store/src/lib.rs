pub mod chunk_store;
pub mod document_store;
pub mod storage;

pub use chunk_store::{ChunkRecord, ChunkStore};
pub use document_store::{Document, DocumentStore, NewDocument};
pub use storage::{Store, Tree};

#[cfg(test)]
mod storage_tests;
