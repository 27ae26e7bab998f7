use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{TaskDeskError, TaskDeskResult};
use crate::gmail::draft::EmailDraft;
use crate::llm::LlmClient;

const TRANSLATOR_SYSTEM_PROMPT: &str = "You convert a natural-language email task into a JSON \
object with exactly these keys: \"to\", \"cc\", \"bcc\" (arrays of email address strings), \
\"subject\" and \"body\" (strings). Honor the requested tone when one is given. Leave an array \
empty when the task names no address for it. Reply with the JSON object only, no commentary.";

/// Converts a natural-language instruction plus optional tone hint into a
/// structured draft. Behind a trait so request handling can be exercised
/// without a live model.
#[async_trait]
pub trait TaskTranslator: Send + Sync {
    async fn translate(&self, task: &str, tone: Option<&str>) -> TaskDeskResult<EmailDraft>;
}

pub struct LlmTaskTranslator {
    client: Arc<LlmClient>,
}

impl LlmTaskTranslator {
    pub fn new(client: Arc<LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskTranslator for LlmTaskTranslator {
    async fn translate(&self, task: &str, tone: Option<&str>) -> TaskDeskResult<EmailDraft> {
        let mut user = format!("Task: {task}");
        if let Some(tone) = tone {
            user.push_str("\nTone: ");
            user.push_str(tone);
        }
        let raw = self.client.chat(TRANSLATOR_SYSTEM_PROMPT, &user).await?;
        parse_draft(&raw)
    }
}

/// Parses the model reply, tolerating a code-fence wrapper.
pub(crate) fn parse_draft(raw: &str) -> TaskDeskResult<EmailDraft> {
    serde_json::from_str(strip_code_fences(raw)).map_err(|error| {
        TaskDeskError::LlmProvider(format!("translator returned invalid JSON: {error}"))
    })
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}
