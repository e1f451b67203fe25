use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::catalog::Video;
use crate::repository::ReadOnlyRepository;

/// Read access to stored videos.
pub struct VideoCrud {
    repo: Arc<dyn ReadOnlyRepository>,
}

impl VideoCrud {
    pub fn new(repo: Arc<dyn ReadOnlyRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_video(&self, video_id: u64) -> Result<Video> {
        let document = self
            .repo
            .get_document(video_id)
            .await?
            .ok_or_else(|| anyhow!("video {} not found", video_id))?;
        Ok(Video::from_document(&document))
    }

    pub async fn list_videos(&self) -> Result<Vec<Video>> {
        let documents = self.repo.list_documents().await?;
        Ok(documents.iter().map(Video::from_document).collect())
    }

    /// One page of videos and the total number stored.
    pub async fn list_videos_paginated(&self, limit: usize, offset: usize) -> Result<(Vec<Video>, usize)> {
        let (documents, total) = self.repo.list_documents_paginated(limit, offset).await?;
        Ok((documents.iter().map(Video::from_document).collect(), total))
    }
}
