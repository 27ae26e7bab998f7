pub mod draft;
pub mod fields;
pub mod locator;
pub mod pipeline;
pub mod retry;
pub mod translator;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::browser::{BrowserSession, SnapshotStore};
use crate::config::GmailConfig;
use crate::errors::TaskDeskResult;
use crate::gmail::pipeline::ComposePipeline;
use crate::gmail::translator::TaskTranslator;

pub use draft::EmailDraft;
pub use pipeline::SendState;

/// Delivery backend for a finalized draft. The production implementation
/// drives a real browser; tests substitute a recorder.
#[async_trait]
pub trait ComposeSender: Send + Sync {
    async fn send(&self, draft: &EmailDraft) -> TaskDeskResult<()>;
}

/// Sends by launching a browser session on the persistent profile, running
/// the compose pipeline, and closing the session on every exit path.
pub struct BrowserComposeSender {
    config: GmailConfig,
    snapshots: SnapshotStore,
}

impl BrowserComposeSender {
    pub fn new(config: GmailConfig) -> Self {
        let snapshots = SnapshotStore::new(config.snapshot_dir.clone());
        Self { config, snapshots }
    }
}

#[async_trait]
impl ComposeSender for BrowserComposeSender {
    async fn send(&self, draft: &EmailDraft) -> TaskDeskResult<()> {
        let session = BrowserSession::launch(&self.config).await?;
        let result = async {
            let mut pipeline =
                ComposePipeline::new(session.page(), &self.snapshots, &self.config.mail_url);
            pipeline.login().await?;
            pipeline.send(draft).await
        }
        .await;
        session.close().await;
        result
    }
}

/// Translator plus delivery, with one in-flight send per process: concurrent
/// sends would race on the shared browser profile.
pub struct GmailService {
    translator: Arc<dyn TaskTranslator>,
    sender: Arc<dyn ComposeSender>,
    send_lock: Mutex<()>,
}

impl GmailService {
    pub fn new(translator: Arc<dyn TaskTranslator>, sender: Arc<dyn ComposeSender>) -> Self {
        Self {
            translator,
            sender,
            send_lock: Mutex::new(()),
        }
    }

    /// Translate, overlay caller recipients, validate. Runs no browser work.
    pub async fn prepare_draft(
        &self,
        task: &str,
        tone: Option<&str>,
        to: &[String],
        cc: &[String],
        bcc: &[String],
    ) -> TaskDeskResult<EmailDraft> {
        let draft = self.translator.translate(task, tone).await?;
        let draft = draft.merge_overrides(to, cc, bcc);
        draft.validate()?;
        tracing::info!(
            to = ?draft.to,
            cc = ?draft.cc,
            bcc = ?draft.bcc,
            subject = %draft.subject,
            "prepared email draft"
        );
        Ok(draft)
    }

    pub async fn send(&self, draft: &EmailDraft) -> TaskDeskResult<()> {
        let _guard = self.send_lock.lock().await;
        self.sender.send(draft).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::errors::TaskDeskError;
    use std::sync::Mutex as StdMutex;

    /// Translator fake returning a canned draft and recording its arguments.
    pub struct FixedTranslator {
        pub draft: EmailDraft,
        pub seen: StdMutex<Vec<(String, Option<String>)>>,
    }

    impl FixedTranslator {
        pub fn new(draft: EmailDraft) -> Self {
            Self {
                draft,
                seen: StdMutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TaskTranslator for FixedTranslator {
        async fn translate(&self, task: &str, tone: Option<&str>) -> TaskDeskResult<EmailDraft> {
            self.seen
                .lock()
                .unwrap()
                .push((task.to_string(), tone.map(str::to_string)));
            Ok(self.draft.clone())
        }
    }

    /// Sender fake that records drafts instead of driving a browser.
    #[derive(Default)]
    pub struct RecordingSender {
        pub sent: StdMutex<Vec<EmailDraft>>,
        pub fail_with: StdMutex<Option<String>>,
    }

    #[async_trait]
    impl ComposeSender for RecordingSender {
        async fn send(&self, draft: &EmailDraft) -> TaskDeskResult<()> {
            if let Some(message) = self.fail_with.lock().unwrap().clone() {
                return Err(TaskDeskError::Automation(message));
            }
            self.sent.lock().unwrap().push(draft.clone());
            Ok(())
        }
    }
}
