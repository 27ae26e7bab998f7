use serde::Deserialize;

use crate::config::LlmConfig;
use crate::errors::{TaskDeskError, TaskDeskResult};

/// Non-streaming client for OpenAI-compatible chat completion endpoints.
pub struct LlmClient {
    api_base: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Single chat-completion round trip; returns the assistant message text.
    pub async fn chat(&self, system: &str, user: &str) -> TaskDeskResult<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            TaskDeskError::LlmProvider("GROQ_API_KEY missing in environment".to_string())
        })?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "stream": false,
            "temperature": self.temperature,
        });

        tracing::debug!(model = %self.model, "sending LLM request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(TaskDeskError::LlmProvider(format!("{}: {}", status, err_body)));
        }

        let completion: ChatCompletion = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| TaskDeskError::LlmProvider("completion had no content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_payload_parses() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "hello" } }
            ]
        }"#;
        let completion: ChatCompletion = serde_json::from_str(raw).expect("payload should parse");
        assert_eq!(
            completion.choices[0].message.content.as_deref(),
            Some("hello")
        );
    }
}
