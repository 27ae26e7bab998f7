use std::sync::Arc;

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::errors::{TaskDeskError, TaskDeskResult};
use crate::llm::LlmClient;

const SEARCH_SYSTEM_PROMPT: &str = "You are a web research assistant. Using only the provided \
search results, answer the question in 3-6 concise, actionable bullet points. Prefer official \
and reputable sources; ignore ads and opinion pieces.";

/// Web search pass-through: one provider call, one LLM call to shape the
/// answer, no local ranking.
pub struct SearchService {
    api_base: String,
    api_key: Option<String>,
    llm: Arc<LlmClient>,
    client: reqwest::Client,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub result: String,
    pub results: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<OrganicHit>,
}

#[derive(Debug, Deserialize)]
struct OrganicHit {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

impl SearchService {
    pub fn new(config: &SearchConfig, llm: Arc<LlmClient>) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            llm,
            client: reqwest::Client::new(),
        }
    }

    pub async fn search_web(
        &self,
        query: &str,
        context: Option<&serde_json::Value>,
        max_results: usize,
    ) -> TaskDeskResult<SearchOutcome> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            TaskDeskError::Search("SERPER_API_KEY missing in environment".to_string())
        })?;

        let response = self
            .client
            .post(format!("{}/search", self.api_base))
            .header("X-API-KEY", api_key)
            .json(&serde_json::json!({ "q": query, "num": max_results }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(TaskDeskError::Search(format!("{}: {}", status, err_body)));
        }

        let parsed: SerperResponse = response.json().await?;
        let results = bullets(&parsed.organic, max_results);
        if results.is_empty() {
            return Err(TaskDeskError::Search(format!(
                "no results returned for query: {query}"
            )));
        }

        let mut user = format!("Question: {query}\n\nSearch results:\n{}", results.join("\n"));
        if let Some(context) = context {
            user.push_str("\n\nCaller context: ");
            user.push_str(&context.to_string());
        }
        let result = self.llm.chat(SEARCH_SYSTEM_PROMPT, &user).await?;

        tracing::info!(query, hits = results.len(), "search completed");
        Ok(SearchOutcome { result, results })
    }
}

fn bullets(hits: &[OrganicHit], max_results: usize) -> Vec<String> {
    hits.iter()
        .take(max_results.max(1))
        .map(|hit| format!("- {}: {} ({})", hit.title, hit.snippet, hit.link))
        .collect()
}
