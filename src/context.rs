use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{TaskDeskError, TaskDeskResult};
use crate::gmail::translator::LlmTaskTranslator;
use crate::gmail::{BrowserComposeSender, GmailService};
use crate::llm::LlmClient;
use crate::pdf::PdfService;
use crate::search::SearchService;

/// Gmail capability at startup: either a working service or the reason it
/// could not be established. Every dependent request checks this instead of
/// poking at nullable globals.
pub enum GmailState {
    Available(GmailService),
    Unavailable { reason: String },
}

impl GmailState {
    pub fn service(&self) -> TaskDeskResult<&GmailService> {
        match self {
            GmailState::Available(service) => Ok(service),
            GmailState::Unavailable { reason } => {
                Err(TaskDeskError::SessionUnavailable(reason.clone()))
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, GmailState::Available(_))
    }

    pub fn init_error(&self) -> Option<&str> {
        match self {
            GmailState::Available(_) => None,
            GmailState::Unavailable { reason } => Some(reason),
        }
    }
}

/// Everything request handlers need, constructed once at process start.
pub struct AppContext {
    pub config: AppConfig,
    pub gmail: GmailState,
    pub search: SearchService,
    pub pdf: PdfService,
}

impl AppContext {
    pub fn initialize(config: AppConfig) -> Arc<Self> {
        let llm = Arc::new(LlmClient::new(&config.llm));
        let gmail = init_gmail(&config, &llm);
        if let Some(reason) = gmail.init_error() {
            tracing::warn!(reason, "gmail service initialization failed");
        }
        Self::with_gmail_state(config, gmail)
    }

    /// Assembles a context around a pre-built Gmail state; used by
    /// `initialize` and by tests that substitute fakes.
    pub fn with_gmail_state(config: AppConfig, gmail: GmailState) -> Arc<Self> {
        let llm = Arc::new(LlmClient::new(&config.llm));
        let search = SearchService::new(&config.search, llm.clone());
        let pdf = PdfService::new(&config.embeddings, &config.qdrant, llm);
        Arc::new(Self {
            config,
            gmail,
            search,
            pdf,
        })
    }
}

fn init_gmail(config: &AppConfig, llm: &Arc<LlmClient>) -> GmailState {
    if !llm.is_configured() {
        return GmailState::Unavailable {
            reason: "GROQ_API_KEY missing in environment".to_string(),
        };
    }
    if config.gmail.profile_dir.is_none() {
        return GmailState::Unavailable {
            reason: "GMAIL_PROFILE_DIR is not configured".to_string(),
        };
    }
    let translator = Arc::new(LlmTaskTranslator::new(llm.clone()));
    let sender = Arc::new(BrowserComposeSender::new(config.gmail.clone()));
    GmailState::Available(GmailService::new(translator, sender))
}
