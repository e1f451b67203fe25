use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vidsearch_core::{Snippet, Transcript};

const TIMEDTEXT_URL: &str = "https://www.youtube.com/api/timedtext";

#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Transcript>;
}

/// Captions from YouTube's `timedtext` endpoint in `json3` format.
///
/// Languages are tried in order, uploaded captions before auto-generated
/// ones. A video without any matching track yields an empty transcript.
pub struct YouTubeTranscriptFetcher {
    client: Client,
    languages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

impl YouTubeTranscriptFetcher {
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            client: Client::new(),
            languages,
        }
    }

    async fn fetch_track(&self, video_id: &str, lang: &str, auto: bool) -> Result<Option<Vec<Snippet>>> {
        let mut query = vec![("v", video_id), ("lang", lang), ("fmt", "json3")];
        if auto {
            query.push(("kind", "asr"));
        }
        let resp = self.client.get(TIMEDTEXT_URL).query(&query).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(anyhow!("timedtext request for {} failed ({})", video_id, status));
        }
        let body = resp.text().await?;
        parse_json3(&body)
    }
}

/// Snippets of a `json3` caption document; `None` for an empty body.
fn parse_json3(body: &str) -> Result<Option<Vec<Snippet>>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let parsed: TimedText = serde_json::from_str(body).context("malformed json3 captions")?;
    let snippets = parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(Snippet::new(
                text,
                event.t_start_ms as f64 / 1000.0,
                event.d_duration_ms as f64 / 1000.0,
            ))
        })
        .collect();
    Ok(Some(snippets))
}

#[async_trait]
impl TranscriptFetcher for YouTubeTranscriptFetcher {
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        for lang in &self.languages {
            for auto in [false, true] {
                if let Some(snippets) = self.fetch_track(video_id, lang, auto).await? {
                    info!(video_id, %lang, auto, snippets = snippets.len(), "fetched transcript");
                    return Ok(Transcript {
                        video_id: video_id.to_string(),
                        language: Some(lang.clone()),
                        snippets,
                    });
                }
            }
        }
        warn!(video_id, languages = ?self.languages, "no transcript available");
        Ok(Transcript::new(video_id, Vec::new()))
    }
}

/// Keeps fetched transcripts as JSON files, one per video.
pub struct CachedTranscriptFetcher<F> {
    inner: F,
    cache_dir: PathBuf,
}

impl<F: TranscriptFetcher> CachedTranscriptFetcher<F> {
    pub fn new(inner: F, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_path(&self, video_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", video_id))
    }
}

async fn read_cached(path: &Path) -> Result<Transcript> {
    let raw = tokio::fs::read(path).await?;
    serde_json::from_slice(&raw).with_context(|| format!("corrupt transcript cache {}", path.display()))
}

#[async_trait]
impl<F: TranscriptFetcher> TranscriptFetcher for CachedTranscriptFetcher<F> {
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        let path = self.cache_path(video_id);
        if path.exists() {
            debug!(video_id, path = %path.display(), "transcript cache hit");
            return read_cached(&path).await;
        }

        debug!(video_id, "transcript cache miss");
        let transcript = self.inner.fetch(video_id).await?;
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        tokio::fs::write(&path, serde_json::to_vec(&transcript)?)
            .await
            .with_context(|| format!("writing transcript cache {}", path.display()))?;
        Ok(transcript)
    }
}
