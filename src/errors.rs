use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskDeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Gmail service unavailable: {0}")]
    SessionUnavailable(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Automation error: {0}")]
    Automation(String),

    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("LLM provider error: {0}")]
    LlmProvider(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

impl TaskDeskError {
    /// Transient failures are worth another attempt; structural ones
    /// (validation, configuration) fail immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TaskDeskError::ElementNotFound(_)
                | TaskDeskError::Automation(_)
                | TaskDeskError::Browser(_)
                | TaskDeskError::Http(_)
        )
    }
}

impl serde::Serialize for TaskDeskError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

pub type TaskDeskResult<T> = Result<T, TaskDeskError>;
