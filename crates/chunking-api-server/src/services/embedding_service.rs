use crate::config::EmbeddingConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Produces one embedding vector per input text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    content: String,
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<String>,
}

/// Embedding client for a llama-server style backend.
#[derive(Clone)]
pub struct EmbeddingService {
    client: Client,
    base_url: String,
    model: String,
}

impl EmbeddingService {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Build a service and verify the backend answers its health endpoint.
    pub async fn connect(config: &EmbeddingConfig) -> Result<Self> {
        let service = Self::new(config);

        let url = format!("{}/health", service.base_url);
        let response = service
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach embedding server")?;

        if !response.status().is_success() {
            anyhow::bail!("Embedding server unhealthy: {}", response.status());
        }

        Ok(service)
    }

    async fn embed_single(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Generating embedding for {} chars", text.len());

        let request = EmbeddingRequest {
            content: text.to_string(),
            model: self.model.clone(),
            input: Some(text.to_string()), // Send both for compatibility
        };

        let url = format!("{}/embedding", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to embedding server")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Embedding API error ({}): {}", status, body);
        }

        let json_value: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse embedding response as JSON")?;

        let embedding = Self::parse_embedding(&json_value)?;

        if embedding.is_empty() {
            anyhow::bail!("Embedding server returned an empty vector");
        }

        Ok(embedding)
    }

    /// Accepts llama.cpp, OpenAI, and bare-array response shapes.
    fn parse_embedding(json_value: &serde_json::Value) -> Result<Vec<f32>> {
        let collect = |arr: &Vec<serde_json::Value>| -> Vec<f32> {
            arr.iter()
                .filter_map(|v| v.as_f64().map(|f| f as f32))
                .collect()
        };

        if let Some(arr) = json_value.as_array() {
            if arr.is_empty() {
                anyhow::bail!("Empty array returned from embedding server");
            }
            // [{"embedding": [...]}] or a direct array of floats
            if let Some(inner) = arr[0]["embedding"].as_array() {
                return Ok(collect(inner));
            }
            return Ok(collect(arr));
        }

        // Standard llama.cpp format: {"embedding": [...]}
        if let Some(inner) = json_value["embedding"].as_array() {
            return Ok(collect(inner));
        }

        // OpenAI data format: {"data": [{"embedding": [...]}]}
        if let Some(data) = json_value["data"].as_array() {
            if let Some(first) = data.first() {
                if let Some(inner) = first["embedding"].as_array() {
                    return Ok(collect(inner));
                }
            }
        }

        anyhow::bail!("Unrecognized embedding response format: {}", json_value)
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingService {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_single(text).await?);
        }
        Ok(embeddings)
    }
}
