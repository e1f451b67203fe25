//! The storage seam the services talk to.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use vidsearch_config::CoreConfig;
use vidsearch_index::{ChunkVector, ChunkVectorIndex};
use vidsearch_store::{ChunkRecord, ChunkStore, DocumentStore, Store};

pub use vidsearch_store::{Document, NewDocument};

/// A chunk record together with its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    pub record: ChunkRecord,
    pub embedding: Vec<f32>,
}

/// A search hit joined with the document it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultChunk {
    pub chunk_index: u32,
    pub text: String,
    pub document_title: String,
    pub document_url: String,
    pub start_ts: f64,
    pub end_ts: f64,
    pub distance: f32,
}

#[async_trait]
pub trait ReadOnlyRepository: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<Document>>;
    async fn list_documents_paginated(&self, limit: usize, offset: usize) -> Result<(Vec<Document>, usize)>;
    async fn get_document(&self, document_id: u64) -> Result<Option<Document>>;
    async fn document_exists(&self, url: &str) -> Result<bool>;
}

#[async_trait]
pub trait Repository: ReadOnlyRepository {
    /// Drop every document, chunk and vector.
    async fn reset(&self) -> Result<()>;
    async fn insert_document(&self, document: NewDocument) -> Result<u64>;
    async fn insert_chunks(&self, chunks: Vec<EmbeddedChunk>) -> Result<()>;
    /// The `num_neighbors` chunks closest to `query_vector`, closest first.
    async fn search(&self, query_vector: &[f32], num_neighbors: usize) -> Result<Vec<SearchResultChunk>>;
}

/// sled records plus a lance vector index, both on local disk.
pub struct LocalRepository {
    store: Store,
    documents: DocumentStore,
    chunks: ChunkStore,
    vectors: Mutex<ChunkVectorIndex>,
}

impl LocalRepository {
    pub async fn open(config: &CoreConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        Self::open_at(&config.store_path(), &config.index_path()).await
    }

    pub async fn open_at(store_path: &Path, index_path: &Path) -> Result<Self> {
        let store = Store::open(store_path)?;
        let documents = DocumentStore::new(&store)?;
        let chunks = ChunkStore::new(&store)?;
        let vectors = ChunkVectorIndex::new(index_path).await?;
        Ok(Self {
            store,
            documents,
            chunks,
            vectors: Mutex::new(vectors),
        })
    }
}

#[async_trait]
impl ReadOnlyRepository for LocalRepository {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        self.documents.list_documents()
    }

    async fn list_documents_paginated(&self, limit: usize, offset: usize) -> Result<(Vec<Document>, usize)> {
        self.documents.list_documents_paginated(limit, offset)
    }

    async fn get_document(&self, document_id: u64) -> Result<Option<Document>> {
        self.documents.get_document(document_id)
    }

    async fn document_exists(&self, url: &str) -> Result<bool> {
        self.documents.document_exists(url)
    }
}

#[async_trait]
impl Repository for LocalRepository {
    async fn reset(&self) -> Result<()> {
        self.documents.clear()?;
        self.chunks.clear()?;
        self.vectors.lock().await.reset().await?;
        self.store.flush()
    }

    async fn insert_document(&self, document: NewDocument) -> Result<u64> {
        let id = self.documents.insert_document(document)?;
        self.store.flush()?;
        Ok(id)
    }

    async fn insert_chunks(&self, chunks: Vec<EmbeddedChunk>) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        let mut vectors = Vec::with_capacity(chunks.len());
        let mut records = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            vectors.push(ChunkVector {
                document_id: chunk.record.document_id,
                chunk_index: chunk.record.chunk_index,
                embedding: chunk.embedding,
            });
            records.push(chunk.record);
        }

        self.chunks.insert_chunks(&records)?;
        self.vectors.lock().await.add(&vectors).await?;
        self.store.flush()?;
        debug!(chunks = records.len(), "stored chunks");
        Ok(())
    }

    async fn search(&self, query_vector: &[f32], num_neighbors: usize) -> Result<Vec<SearchResultChunk>> {
        let hits = self.vectors.lock().await.search(query_vector, num_neighbors).await?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(record) = self.chunks.get_chunk(hit.document_id, hit.chunk_index)? else {
                warn!(id = %hit.id, "vector without chunk record");
                continue;
            };
            let Some(document) = self.documents.get_document(hit.document_id)? else {
                warn!(id = %hit.id, "chunk of missing document");
                continue;
            };
            results.push(SearchResultChunk {
                chunk_index: record.chunk_index,
                text: record.text,
                document_title: document.title,
                document_url: document.url,
                start_ts: record.start_ts,
                end_ts: record.end_ts,
                distance: hit.distance,
            });
        }
        Ok(results)
    }
}
