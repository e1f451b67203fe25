use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use vidsearch_core::traits::{Embedder, TranscriptChunker};
use vidsearch_core::Chunk;
use vidsearch_store::ChunkRecord;

use crate::catalog::{load_videos, Video};
use crate::fetcher::TranscriptFetcher;
use crate::repository::{EmbeddedChunk, NewDocument, Repository};

pub const DEFAULT_BATCH_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The video's URL was already stored.
    Skipped,
    Inserted { document_id: u64, chunks: usize },
}

/// Fetch, segment, embed and store videos.
pub struct VideoProcessingService {
    repo: Arc<dyn Repository>,
    fetcher: Arc<dyn TranscriptFetcher>,
    chunker: Arc<dyn TranscriptChunker>,
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
}

impl VideoProcessingService {
    pub fn new(
        repo: Arc<dyn Repository>,
        fetcher: Arc<dyn TranscriptFetcher>,
        chunker: Arc<dyn TranscriptChunker>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            repo,
            fetcher,
            chunker,
            embedder,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub async fn process_video(&self, video: &Video) -> Result<ProcessOutcome> {
        let url = video.url();
        if self.repo.document_exists(&url).await? {
            info!(video = %video.id, "document already exists, skipping");
            return Ok(ProcessOutcome::Skipped);
        }

        let transcript = self
            .fetcher
            .fetch(&video.id)
            .await
            .with_context(|| format!("fetching transcript of {}", video.id))?;

        // segmentation blocks on model calls
        let chunker = self.chunker.clone();
        let chunks = tokio::task::spawn_blocking(move || chunker.split_into_chunks(&transcript))
            .await
            .context("segmentation task panicked")??;

        let chunks: Vec<Chunk> = chunks
            .into_iter()
            .filter(|c| !c.text.trim().is_empty())
            .collect();
        if chunks.is_empty() {
            warn!(video = %video.id, "transcript produced no text");
        }

        info!(video = %video.id, chunks = chunks.len(), "embedding chunks");
        let vectors = self.embed_all(&chunks).await?;

        let document_id = self
            .repo
            .insert_document(NewDocument::new(video.title.clone(), url, video.meta.clone()))
            .await?;

        let embedded: Vec<EmbeddedChunk> = chunks
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (chunk, embedding))| EmbeddedChunk {
                record: ChunkRecord::from_chunk(chunk, i as u32, document_id),
                embedding,
            })
            .collect();
        let count = embedded.len();
        self.repo.insert_chunks(embedded).await?;

        info!(video = %video.id, document_id, chunks = count, "stored video");
        Ok(ProcessOutcome::Inserted {
            document_id,
            chunks: count,
        })
    }

    async fn embed_all(&self, chunks: &[Chunk]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embedded = self.embedder.embed_batch(&texts).await?;
            if embedded.len() != texts.len() {
                return Err(anyhow!(
                    "Embedding count mismatch (got {}, expected {})",
                    embedded.len(),
                    texts.len()
                ));
            }
            vectors.extend(embedded);
        }
        Ok(vectors)
    }

    /// Process every video of the catalog at `videos_file`.
    pub async fn populate_default_videos(&self, videos_file: &Path, drop_first: bool) -> Result<usize> {
        if drop_first {
            info!("dropping existing documents");
            self.repo.reset().await?;
        }

        let videos = load_videos(videos_file)?;
        info!(count = videos.len(), "processing videos");

        let pb = ProgressBar::new(videos.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut inserted = 0;
        for video in &videos {
            pb.set_message(video.id.clone());
            if let ProcessOutcome::Inserted { .. } = self.process_video(video).await? {
                inserted += 1;
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
        Ok(inserted)
    }

    /// Write every stored video as a catalog file `populate` can read back.
    pub async fn export_videos_as_json_file(&self, path: &Path) -> Result<usize> {
        let videos: Vec<Video> = self
            .repo
            .list_documents()
            .await?
            .iter()
            .map(|doc| Video {
                internal_id: None,
                ..Video::from_document(doc)
            })
            .collect();

        let json = serde_json::to_string_pretty(&videos)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(videos.len())
    }
}
