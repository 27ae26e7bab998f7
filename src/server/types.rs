use serde::{Deserialize, Serialize};

use crate::gmail::EmailDraft;

#[derive(Debug, Deserialize)]
pub struct GmailSendRequest {
    pub task: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GmailSendResponse {
    pub success: bool,
    pub message: String,
    pub email_preview: EmailDraft,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub result: String,
    pub results: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PdfSearchRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct PdfSearchResponse {
    pub response: String,
    pub context: String,
    pub chunks_found: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub chunks_added: usize,
}
