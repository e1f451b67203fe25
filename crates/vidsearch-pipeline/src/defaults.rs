use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use vidsearch_config::Config;
use vidsearch_context::Capabilities;

use crate::crud::VideoCrud;
use crate::fetcher::{CachedTranscriptFetcher, TranscriptFetcher, YouTubeTranscriptFetcher};
use crate::processing::VideoProcessingService;
use crate::repository::LocalRepository;
use crate::search::VideoSearchService;

/// The services wired to local storage and the configured models.
pub struct Services {
    pub processing: VideoProcessingService,
    pub search: VideoSearchService,
    pub crud: VideoCrud,
    pub capabilities: Capabilities,
}

impl Services {
    /// Must be called inside a tokio runtime.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let repo = Arc::new(LocalRepository::open(&config.core).await?);
        let capabilities = Capabilities::from_config(config)?;

        let youtube = YouTubeTranscriptFetcher::new(config.youtube.languages.clone());
        let fetcher: Arc<dyn TranscriptFetcher> = if config.youtube.cache {
            Arc::new(CachedTranscriptFetcher::new(
                youtube,
                config.core.transcript_cache_dir(),
            ))
        } else {
            Arc::new(youtube)
        };

        let processing = VideoProcessingService::new(
            repo.clone(),
            fetcher,
            Arc::new(capabilities.segmenter(config)),
            capabilities.embedder.clone(),
        )
        .with_batch_size(config.embedding.batch_size);
        let search = VideoSearchService::new(repo.clone(), capabilities.embedder.clone())
            .with_num_neighbors(config.search.top_k);
        let crud = VideoCrud::new(repo);

        info!(data_dir = %config.core.data_dir.display(), "services ready");
        Ok(Self {
            processing,
            search,
            crud,
            capabilities,
        })
    }
}
