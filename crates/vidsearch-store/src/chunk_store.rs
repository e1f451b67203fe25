use crate::storage::{Store, Tree};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use vidsearch_core::Chunk;

/// A segmented chunk as persisted, keyed by document and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub chunk_index: u32,
    pub start_ts: f64,
    pub end_ts: f64,
    pub text: String,
    pub document_id: u64,
}

impl ChunkRecord {
    pub fn from_chunk(chunk: &Chunk, chunk_index: u32, document_id: u64) -> Self {
        Self {
            chunk_index,
            start_ts: chunk.metadata.start_time().unwrap_or(0.0),
            end_ts: chunk.metadata.end_time(),
            text: chunk.text.clone(),
            document_id,
        }
    }

    pub fn key(&self) -> String {
        chunk_key(self.document_id, self.chunk_index)
    }
}

fn chunk_key(document_id: u64, chunk_index: u32) -> String {
    format!("{}:{:08}", document_id, chunk_index)
}

pub struct ChunkStore {
    chunks_tree: Tree,
}

impl ChunkStore {
    pub fn new(store: &Store) -> Result<Self> {
        Ok(Self {
            chunks_tree: store.open_tree("chunks")?,
        })
    }

    pub fn insert_chunk(&self, record: &ChunkRecord) -> Result<()> {
        let bytes = bincode::serialize(record)?;
        self.chunks_tree.insert(record.key(), bytes)
    }

    pub fn insert_chunks(&self, records: &[ChunkRecord]) -> Result<()> {
        for record in records {
            self.insert_chunk(record)?;
        }
        Ok(())
    }

    pub fn get_chunk(&self, document_id: u64, chunk_index: u32) -> Result<Option<ChunkRecord>> {
        match self.chunks_tree.get(chunk_key(document_id, chunk_index))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Chunks of one document, ordered by `chunk_index`.
    pub fn chunks_for_document(&self, document_id: u64) -> Result<Vec<ChunkRecord>> {
        let mut records = Vec::new();
        for item in self.chunks_tree.scan_prefix(format!("{}:", document_id)) {
            let (_, bytes) = item?;
            records.push(bincode::deserialize(&bytes)?);
        }
        Ok(records)
    }

    pub fn count(&self) -> usize {
        self.chunks_tree.len()
    }

    pub fn clear(&self) -> Result<()> {
        self.chunks_tree.clear()
    }
}
