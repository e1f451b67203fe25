mod common;

use anyhow::Result;
use common::{fake_vector, MockChunker, MockEmbedder, MockFetcher};
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;
use vidsearch_pipeline::{
    LocalRepository, ReadOnlyRepository, Repository, Video, VideoProcessingService,
};

async fn open(dir: &std::path::Path) -> Result<Arc<LocalRepository>> {
    Ok(Arc::new(
        LocalRepository::open_at(&dir.join("store.db"), &dir.join("chunks.lance")).await?,
    ))
}

#[tokio::test]
async fn test_processed_video_is_searchable() -> Result<()> {
    let dir = tempdir()?;
    let repo = open(dir.path()).await?;
    let service = VideoProcessingService::new(
        repo.clone(),
        Arc::new(MockFetcher::default()),
        Arc::new(MockChunker::default()),
        Arc::new(MockEmbedder::default()),
    );

    service
        .process_video(&Video::new("abc", "Talk", json!({ "speaker": "x" })))
        .await?;

    assert!(repo.document_exists("https://www.youtube.com/watch?v=abc").await?);
    let results = repo.search(&fake_vector("Chunk 2"), 2).await?;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text, "Chunk 2");
    assert_eq!(results[0].chunk_index, 1);
    assert_eq!(results[0].document_title, "Talk");
    assert_eq!(results[0].start_ts, 10.0);
    assert!(results[0].distance <= results[1].distance);

    // second run is a no-op
    service.process_video(&Video::new("abc", "Talk", json!({}))).await?;
    assert_eq!(repo.list_documents().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_reset_clears_documents_and_vectors() -> Result<()> {
    let dir = tempdir()?;
    let repo = open(dir.path()).await?;
    let service = VideoProcessingService::new(
        repo.clone(),
        Arc::new(MockFetcher::default()),
        Arc::new(MockChunker::default()),
        Arc::new(MockEmbedder::default()),
    );
    service
        .process_video(&Video::new("abc", "Talk", json!({})))
        .await?;

    repo.reset().await?;

    assert!(repo.list_documents().await?.is_empty());
    assert!(repo.search(&fake_vector("Chunk 1"), 5).await?.is_empty());
    Ok(())
}
