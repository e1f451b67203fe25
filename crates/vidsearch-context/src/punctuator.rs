use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::env;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use vidsearch_config::PunctuationConfig;
use vidsearch_core::traits::{LabeledToken, PunctuationLabeler};

/// Punctuation labels from a hosted token-classification model.
///
/// The endpoint receives `{"inputs": text}` and answers with aggregated
/// entity groups. [`PunctuationLabeler::label`] blocks on the runtime the
/// labeler was built in, so call it from `spawn_blocking` or a rayon worker,
/// never from an async task.
pub struct HttpPunctuationLabeler {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    runtime: Handle,
}

#[derive(Debug, Deserialize)]
struct EntityGroup {
    entity_group: String,
    word: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LabelResponse {
    Flat(Vec<EntityGroup>),
    Batched(Vec<Vec<EntityGroup>>),
}

impl HttpPunctuationLabeler {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let runtime = Handle::try_current()
            .context("the punctuation labeler must be created inside a tokio runtime")?;
        Ok(Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key,
            runtime,
        })
    }

    pub fn from_config(config: &PunctuationConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            warn!(var = %config.api_key_env, "no API token set for the punctuation endpoint");
        }
        Self::new(config.resolved_endpoint(), api_key)
    }

    pub async fn label_async(&self, text: &str) -> Result<Vec<LabeledToken>> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "inputs": text,
                "parameters": { "aggregation_strategy": "simple" },
            }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("punctuation request failed ({}): {}", status, body));
        }

        let body = resp.text().await?;
        let tokens = parse_response(&body)?;
        debug!(chars = text.len(), tokens = tokens.len(), "labeled punctuation");
        Ok(tokens)
    }
}

fn parse_response(body: &str) -> Result<Vec<LabeledToken>> {
    let parsed: LabelResponse =
        serde_json::from_str(body).context("unexpected punctuation response shape")?;
    let groups = match parsed {
        LabelResponse::Flat(groups) => groups,
        LabelResponse::Batched(batches) => batches.into_iter().flatten().collect(),
    };
    Ok(groups
        .into_iter()
        .map(|g| LabeledToken::new(g.word.trim(), g.entity_group))
        .collect())
}

impl PunctuationLabeler for HttpPunctuationLabeler {
    fn label(&self, text: &str) -> Result<Vec<LabeledToken>> {
        self.runtime.block_on(self.label_async(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aggregated_groups() -> Result<()> {
        let body = r#"[
            {"entity_group": "0", "score": 0.99, "word": "hello", "start": 0, "end": 5},
            {"entity_group": ".", "score": 0.97, "word": " world", "start": 6, "end": 11}
        ]"#;
        let tokens = parse_response(body)?;
        assert_eq!(
            tokens,
            vec![LabeledToken::new("hello", "0"), LabeledToken::new("world", ".")]
        );
        Ok(())
    }

    #[test]
    fn test_parse_batched_groups() -> Result<()> {
        let body = r#"[[{"entity_group": "?", "word": "why"}]]"#;
        assert_eq!(parse_response(body)?, vec![LabeledToken::new("why", "?")]);
        Ok(())
    }

    #[test]
    fn test_error_payload_is_rejected() {
        assert!(parse_response(r#"{"error": "Model is loading"}"#).is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_label_from_blocking_thread_reports_connection_errors() -> Result<()> {
        let labeler = HttpPunctuationLabeler::new("http://127.0.0.1:9/punctuate", None)?;
        let result = tokio::task::spawn_blocking(move || labeler.label("hello world")).await?;
        assert!(result.is_err());
        Ok(())
    }
}
