use serde::Deserialize;

use crate::config::EmbeddingsConfig;
use crate::errors::{TaskDeskError, TaskDeskResult};

/// Client for an OpenAI-compatible `/embeddings` endpoint.
pub struct EmbeddingsClient {
    api_base: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

impl EmbeddingsClient {
    pub fn new(config: &EmbeddingsConfig) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn embed(&self, inputs: &[String]) -> TaskDeskResult<Vec<Vec<f32>>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            TaskDeskError::Pdf("EMBEDDINGS_API_KEY missing in environment".to_string())
        })?;

        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(api_key)
            .json(&serde_json::json!({ "model": self.model, "input": inputs }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(TaskDeskError::Pdf(format!(
                "embeddings request failed: {}: {}",
                status, err_body
            )));
        }

        let parsed: EmbeddingsResponse = response.json().await?;
        if parsed.data.len() != inputs.len() {
            return Err(TaskDeskError::Pdf(format!(
                "embeddings count mismatch: sent {}, got {}",
                inputs.len(),
                parsed.data.len()
            )));
        }
        Ok(parsed.data.into_iter().map(|item| item.embedding).collect())
    }
}
