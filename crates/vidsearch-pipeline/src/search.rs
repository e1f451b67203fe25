use anyhow::Result;
use std::sync::Arc;
use tracing::debug;
use vidsearch_core::traits::Embedder;

use crate::repository::{Repository, SearchResultChunk};

pub const DEFAULT_NUM_NEIGHBORS: usize = 5;

pub struct VideoSearchService {
    repo: Arc<dyn Repository>,
    embedder: Arc<dyn Embedder>,
    num_neighbors: usize,
}

impl VideoSearchService {
    pub fn new(repo: Arc<dyn Repository>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            repo,
            embedder,
            num_neighbors: DEFAULT_NUM_NEIGHBORS,
        }
    }

    pub fn with_num_neighbors(mut self, num_neighbors: usize) -> Self {
        self.num_neighbors = num_neighbors;
        self
    }

    /// Chunks semantically closest to `query`; `None` uses the configured count.
    pub async fn search(&self, query: &str, num_neighbors: Option<usize>) -> Result<Vec<SearchResultChunk>> {
        let k = num_neighbors.unwrap_or(self.num_neighbors);
        let query_vector = self.embedder.embed(query).await?;
        let results = self.repo.search(&query_vector, k).await?;
        debug!(query, k, hits = results.len(), "searched");
        Ok(results)
    }
}
