use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use tracing::info;
use vidsearch_config::{EmbeddingBackend, EmbeddingConfig};
use vidsearch_core::traits::Embedder;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";

/// Select the embedder for the configured backend.
pub fn select_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.backend {
        EmbeddingBackend::External => {
            let api_key = env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow!("embedding backend 'openai' needs OPENAI_API_KEY"))?;
            let model = if config.model_name.is_empty() {
                DEFAULT_OPENAI_MODEL.to_string()
            } else {
                config.model_name.clone()
            };
            info!(backend = "openai", %model, "embedder ready");
            Ok(Arc::new(ExternalEmbedder::new(model, api_key)))
        }
        EmbeddingBackend::Ollama => {
            let embedder = OllamaEmbedder::new(config.model_name.clone());
            info!(backend = "ollama", model = %config.model_name, url = %embedder.base_url, "embedder ready");
            Ok(Arc::new(embedder))
        }
    }
}

/// OpenAI-compatible `/v1/embeddings` client.
pub struct ExternalEmbedder {
    model: String,
    api_key: String,
    client: Client,
}

impl ExternalEmbedder {
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            client: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingItem {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for ExternalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut list = self.embed_batch(&[text.to_string()]).await?;
        list.pop().ok_or_else(|| anyhow!("Empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let resp = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": texts,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI embeddings failed ({}): {}", status, body));
        }

        let parsed: OpenAIEmbeddingResponse = resp.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(anyhow!(
                "Mismatch embedding count: got {}, expected {}",
                parsed.data.len(),
                texts.len()
            ));
        }
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Local Ollama `/api/embeddings` client. `OLLAMA_BASE_URL` overrides the host.
pub struct OllamaEmbedder {
    model: String,
    base_url: String,
    client: Client,
}

impl OllamaEmbedder {
    pub fn new(model: String) -> Self {
        let base_url =
            env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());
        Self::with_base_url(model, base_url)
    }

    pub fn with_base_url(model: String, base_url: String) -> Self {
        Self {
            model,
            base_url,
            client: Client::new(),
        }
    }
}

fn parse_ollama_embedding(json: &serde_json::Value) -> Result<Vec<f32>> {
    let embedding = json["embedding"]
        .as_array()
        .ok_or_else(|| anyhow!("No embedding field in Ollama response"))?
        .iter()
        .filter_map(|v| v.as_f64())
        .map(|f| f as f32)
        .collect::<Vec<f32>>();
    Ok(embedding)
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let resp = self
            .client
            .post(format!(
                "{}/api/embeddings",
                self.base_url.trim_end_matches('/')
            ))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": text,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Ollama embeddings failed ({}): {}", status, body));
        }

        let json: serde_json::Value = resp.json().await?;
        parse_ollama_embedding(&json)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ollama_embedding() -> Result<()> {
        let json = serde_json::json!({ "embedding": [0.25, -1.0, 3] });
        assert_eq!(parse_ollama_embedding(&json)?, vec![0.25, -1.0, 3.0]);
        assert!(parse_ollama_embedding(&serde_json::json!({ "error": "no model" })).is_err());
        Ok(())
    }

    #[test]
    fn test_select_ollama_by_default() -> Result<()> {
        let config = EmbeddingConfig::default();
        assert_eq!(config.backend, EmbeddingBackend::Ollama);
        select_embedder(&config)?;
        Ok(())
    }

    #[tokio::test]
    async fn test_openai_empty_batch_skips_request() -> Result<()> {
        let embedder = ExternalEmbedder::new("m".into(), "k".into());
        assert!(embedder.embed_batch(&[]).await?.is_empty());
        Ok(())
    }
}
