use reqwest::Method;
use serde::Deserialize;

use crate::config::QdrantConfig;
use crate::errors::{TaskDeskError, TaskDeskResult};

/// Minimal Qdrant REST client: one collection, upsert and similarity search.
pub struct QdrantStore {
    url: String,
    collection: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    #[serde(default)]
    payload: Option<PointPayload>,
}

#[derive(Debug, Deserialize)]
struct PointPayload {
    #[serde(default)]
    page_content: String,
}

impl QdrantStore {
    pub fn new(config: &QdrantConfig) -> Self {
        Self {
            url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, format!("{}{}", self.url, path));
        if let Some(api_key) = &self.api_key {
            builder = builder.header("api-key", api_key);
        }
        builder
    }

    /// Creates the collection on first use; a pre-existing collection is
    /// left untouched.
    pub async fn ensure_collection(&self, vector_size: usize) -> TaskDeskResult<()> {
        let existing = self
            .request(Method::GET, &format!("/collections/{}", self.collection))
            .send()
            .await?;
        if existing.status().is_success() {
            return Ok(());
        }

        let created = self
            .request(Method::PUT, &format!("/collections/{}", self.collection))
            .json(&serde_json::json!({
                "vectors": { "size": vector_size, "distance": "Cosine" }
            }))
            .send()
            .await?;
        if !created.status().is_success() {
            let status = created.status();
            let err_body = created.text().await.unwrap_or_default();
            return Err(TaskDeskError::Pdf(format!(
                "could not create collection: {}: {}",
                status, err_body
            )));
        }
        tracing::info!(collection = %self.collection, vector_size, "qdrant collection created");
        Ok(())
    }

    pub async fn upsert_chunks(
        &self,
        chunks: &[String],
        vectors: &[Vec<f32>],
    ) -> TaskDeskResult<()> {
        let points: Vec<serde_json::Value> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| {
                serde_json::json!({
                    "id": uuid::Uuid::new_v4().to_string(),
                    "vector": vector,
                    "payload": { "page_content": chunk },
                })
            })
            .collect();

        let response = self
            .request(
                Method::PUT,
                &format!("/collections/{}/points?wait=true", self.collection),
            )
            .json(&serde_json::json!({ "points": points }))
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(TaskDeskError::Pdf(format!(
                "upsert failed: {}: {}",
                status, err_body
            )));
        }
        Ok(())
    }

    /// Returns the stored chunk texts nearest to the query vector.
    pub async fn search(&self, vector: &[f32], limit: usize) -> TaskDeskResult<Vec<String>> {
        let response = self
            .request(
                Method::POST,
                &format!("/collections/{}/points/search", self.collection),
            )
            .json(&serde_json::json!({
                "vector": vector,
                "limit": limit,
                "with_payload": true,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(TaskDeskError::Pdf(format!(
                "search failed: {}: {}",
                status, err_body
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed
            .result
            .into_iter()
            .filter_map(|point| point.payload)
            .map(|payload| payload.page_content)
            .filter(|content| !content.is_empty())
            .collect())
    }
}
