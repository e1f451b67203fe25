#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;
use vidsearch_core::traits::{Embedder, TranscriptChunker};
use vidsearch_core::{Chunk, ChunkMetadata, Snippet, Transcript};
use vidsearch_pipeline::repository::{Document, NewDocument};
use vidsearch_pipeline::{EmbeddedChunk, ReadOnlyRepository, Repository, SearchResultChunk, TranscriptFetcher};

pub fn test_document() -> Document {
    Document {
        id: 1,
        title: "Test Video".into(),
        url: "https://youtube.com/watch?v=video123".into(),
        created_at: 0,
        meta: json!({ "duration": "10:00" }),
    }
}

fn result_chunk(chunk_index: u32, text: &str, start_ts: f64, distance: f32) -> SearchResultChunk {
    SearchResultChunk {
        chunk_index,
        text: text.into(),
        document_title: "Test Video".into(),
        document_url: "https://youtube.com/watch?v=video123".into(),
        start_ts,
        end_ts: start_ts + 10.0,
        distance,
    }
}

/// Records calls and answers with canned data.
#[derive(Default)]
pub struct MockRepository {
    pub exists: bool,
    pub exists_calls: Mutex<Vec<String>>,
    pub get_calls: Mutex<Vec<u64>>,
    pub list_calls: Mutex<usize>,
    pub paginated_calls: Mutex<Vec<(usize, usize)>>,
    pub inserted_documents: Mutex<Vec<NewDocument>>,
    pub inserted_chunks: Mutex<Vec<Vec<EmbeddedChunk>>>,
    pub search_calls: Mutex<Vec<(Vec<f32>, usize)>>,
    pub resets: Mutex<usize>,
}

impl MockRepository {
    pub fn existing() -> Self {
        Self {
            exists: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ReadOnlyRepository for MockRepository {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        *self.list_calls.lock().unwrap() += 1;
        Ok(vec![test_document()])
    }

    async fn list_documents_paginated(&self, limit: usize, offset: usize) -> Result<(Vec<Document>, usize)> {
        self.paginated_calls.lock().unwrap().push((limit, offset));
        Ok((vec![test_document()], 1))
    }

    async fn get_document(&self, document_id: u64) -> Result<Option<Document>> {
        self.get_calls.lock().unwrap().push(document_id);
        Ok(Some(test_document()))
    }

    async fn document_exists(&self, url: &str) -> Result<bool> {
        self.exists_calls.lock().unwrap().push(url.to_string());
        Ok(self.exists)
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn reset(&self) -> Result<()> {
        *self.resets.lock().unwrap() += 1;
        Ok(())
    }

    async fn insert_document(&self, document: NewDocument) -> Result<u64> {
        self.inserted_documents.lock().unwrap().push(document);
        Ok(1)
    }

    async fn insert_chunks(&self, chunks: Vec<EmbeddedChunk>) -> Result<()> {
        self.inserted_chunks.lock().unwrap().push(chunks);
        Ok(())
    }

    async fn search(&self, query_vector: &[f32], num_neighbors: usize) -> Result<Vec<SearchResultChunk>> {
        self.search_calls
            .lock()
            .unwrap()
            .push((query_vector.to_vec(), num_neighbors));
        Ok(vec![
            result_chunk(1, "Result chunk 1", 0.0, 0.95),
            result_chunk(2, "Result chunk 2", 10.0, 0.85),
        ])
    }
}

#[derive(Default)]
pub struct MockFetcher {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl TranscriptFetcher for MockFetcher {
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        self.calls.lock().unwrap().push(video_id.to_string());
        Ok(Transcript::new(
            video_id,
            vec![Snippet::new("This is a transcript", 0.0, 20.0)],
        ))
    }
}

/// Two fixed chunks plus an empty one the service must drop.
#[derive(Default)]
pub struct MockChunker {
    pub calls: Mutex<usize>,
}

impl TranscriptChunker for MockChunker {
    fn split_into_chunks(&self, _transcript: &Transcript) -> Result<Vec<Chunk>> {
        *self.calls.lock().unwrap() += 1;
        Ok(vec![
            Chunk::new("Chunk 1", ChunkMetadata::new(0.0, 10.0)?),
            Chunk::new("Chunk 2", ChunkMetadata::new(10.0, 10.0)?),
            Chunk::empty(),
        ])
    }
}

/// Deterministic vectors: a text's bytes folded into three buckets.
#[derive(Default)]
pub struct MockEmbedder {
    pub embed_calls: Mutex<Vec<String>>,
    pub batch_calls: Mutex<Vec<Vec<String>>>,
}

pub fn fake_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; 3];
    for (i, b) in text.bytes().enumerate() {
        v[i % 3] += b as f32 / 255.0;
    }
    v
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_calls.lock().unwrap().push(text.to_string());
        Ok(fake_vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.lock().unwrap().push(texts.to_vec());
        Ok(texts.iter().map(|t| fake_vector(t)).collect())
    }
}
