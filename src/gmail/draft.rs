use serde::{Deserialize, Serialize};

use crate::errors::{TaskDeskError, TaskDeskResult};

/// Structured email produced by the translator (or directly by a caller) and
/// consumed exactly once by the compose pipeline. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl EmailDraft {
    /// Overlays caller-supplied recipients onto the translator output.
    /// Caller values win when present and non-empty.
    pub fn merge_overrides(mut self, to: &[String], cc: &[String], bcc: &[String]) -> Self {
        if !to.is_empty() {
            self.to = to.to_vec();
        }
        if !cc.is_empty() {
            self.cc = cc.to_vec();
        }
        if !bcc.is_empty() {
            self.bcc = bcc.to_vec();
        }
        self
    }

    /// Structural precondition for any send attempt.
    pub fn validate(&self) -> TaskDeskResult<()> {
        if self.to.is_empty() {
            return Err(TaskDeskError::Validation(
                "no recipient found after parsing/merge".to_string(),
            ));
        }
        Ok(())
    }
}
