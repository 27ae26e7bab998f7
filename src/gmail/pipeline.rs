use std::time::Duration;

use crate::browser::{PageDriver, SnapshotStore};
use crate::errors::TaskDeskResult;
use crate::gmail::draft::EmailDraft;
use crate::gmail::fields::{
    FieldKind, CONFIRMATION_SELECTOR, DIALOG_SELECTOR, MAIN_CONTENT_SELECTOR,
};
use crate::gmail::locator::locate_field;
use crate::gmail::retry::{with_retry, RetryPolicy};

/// Cold session restore can take much longer than the page paint, so the
/// compose affordance gets the long budget and main content the short one.
const COMPOSE_AFFORDANCE_TIMEOUT: Duration = Duration::from_secs(120);
const MAIN_CONTENT_TIMEOUT: Duration = Duration::from_secs(60);
const DIALOG_TIMEOUT: Duration = Duration::from_secs(10);
const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(10);
const DIALOG_SETTLE: Duration = Duration::from_secs(1);

const SEND_MAX_ATTEMPTS: u32 = 3;
const SEND_BACKOFF: Duration = Duration::from_secs(2);
const FILL_RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_secs(1));

/// Pipeline progress; `Sent` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    NotStarted,
    LoggedIn,
    ComposeOpen,
    RecipientsFilled,
    SubjectFilled,
    BodyFilled,
    Sent,
    Failed,
}

/// Drives one outgoing message end to end: login, compose, recipients,
/// subject, body, send, confirmation.
pub struct ComposePipeline<'a, P: PageDriver + ?Sized> {
    page: &'a P,
    snapshots: &'a SnapshotStore,
    mail_url: &'a str,
    state: SendState,
}

impl<'a, P: PageDriver + ?Sized> ComposePipeline<'a, P> {
    pub fn new(page: &'a P, snapshots: &'a SnapshotStore, mail_url: &'a str) -> Self {
        Self {
            page,
            snapshots,
            mail_url,
            state: SendState::NotStarted,
        }
    }

    pub fn state(&self) -> SendState {
        self.state
    }

    /// Restores the authenticated session from the persistent profile. Not
    /// retried: a login failure is fatal for the whole send.
    pub async fn login(&mut self) -> TaskDeskResult<()> {
        self.page.goto(self.mail_url).await?;
        self.page
            .wait_visible(FieldKind::Compose.selectors()[0], COMPOSE_AFFORDANCE_TIMEOUT)
            .await?;
        self.page
            .wait_visible(MAIN_CONTENT_SELECTOR, MAIN_CONTENT_TIMEOUT)
            .await?;
        self.state = SendState::LoggedIn;
        tracing::info!("gmail session restored from persistent profile");
        Ok(())
    }

    /// Composes and sends one message. The compose-through-confirmation
    /// sequence is retried as a whole (login is not redone); a diagnostic
    /// snapshot is captured once when the final attempt fails.
    pub async fn send(&mut self, draft: &EmailDraft) -> TaskDeskResult<()> {
        draft.validate()?;
        tracing::info!(to = ?draft.to, subject = %draft.subject, "sending email");

        let mut attempt = 1;
        loop {
            match self.attempt_send(draft).await {
                Ok(()) => {
                    self.state = SendState::Sent;
                    tracing::info!("email sent and confirmed");
                    return Ok(());
                }
                Err(error) if !error.is_retryable() => {
                    self.state = SendState::Failed;
                    return Err(error);
                }
                Err(error) => {
                    if attempt >= SEND_MAX_ATTEMPTS {
                        self.state = SendState::Failed;
                        tracing::error!(attempts = attempt, %error, "send failed after all attempts");
                        if let Err(snapshot_error) =
                            self.snapshots.capture(self.page, "send_error").await
                        {
                            tracing::warn!(%snapshot_error, "could not capture diagnostic snapshot");
                        }
                        return Err(error);
                    }
                    tracing::warn!(attempt, %error, "send attempt failed, restarting from compose");
                    attempt += 1;
                    tokio::time::sleep(SEND_BACKOFF).await;
                }
            }
        }
    }

    async fn attempt_send(&mut self, draft: &EmailDraft) -> TaskDeskResult<()> {
        self.open_compose().await?;
        self.fill_recipients(draft).await?;
        self.fill_subject_and_body(draft).await?;
        self.click_send().await
    }

    async fn open_compose(&mut self) -> TaskDeskResult<()> {
        let compose = locate_field(self.page, FieldKind::Compose).await?;
        self.page.click(&compose).await?;
        self.page.wait_visible(DIALOG_SELECTOR, DIALOG_TIMEOUT).await?;
        // Brief pause while the dialog finishes mounting its inputs.
        tokio::time::sleep(DIALOG_SETTLE).await;
        self.state = SendState::ComposeOpen;
        Ok(())
    }

    /// Strict order: every `to` entry, then `cc`, then `bcc`.
    async fn fill_recipients(&mut self, draft: &EmailDraft) -> TaskDeskResult<()> {
        for address in &draft.to {
            self.commit_recipient(FieldKind::To, address).await?;
        }
        for address in &draft.cc {
            self.commit_recipient(FieldKind::Cc, address).await?;
        }
        for address in &draft.bcc {
            self.commit_recipient(FieldKind::Bcc, address).await?;
        }
        self.state = SendState::RecipientsFilled;
        Ok(())
    }

    /// Gmail replaces the recipient input after each commit, so the field is
    /// re-located for every address.
    async fn commit_recipient(&self, kind: FieldKind, address: &str) -> TaskDeskResult<()> {
        let selector = locate_field(self.page, kind).await?;
        self.page.click(&selector).await?;
        self.page.fill(&selector, address).await?;
        self.page.press(&selector, "Enter").await
    }

    async fn fill_subject_and_body(&mut self, draft: &EmailDraft) -> TaskDeskResult<()> {
        let page = self.page;

        let subject = draft.subject.as_str();
        with_retry(&FILL_RETRY, "fill subject", || async move {
            let selector = locate_field(page, FieldKind::Subject).await?;
            page.click(&selector).await?;
            page.fill(&selector, subject).await
        })
        .await?;
        self.state = SendState::SubjectFilled;

        let body = draft.body.as_str();
        with_retry(&FILL_RETRY, "fill body", || async move {
            let selector = locate_field(page, FieldKind::Body).await?;
            page.click(&selector).await?;
            page.fill(&selector, body).await
        })
        .await?;
        self.state = SendState::BodyFilled;
        Ok(())
    }

    async fn click_send(&mut self) -> TaskDeskResult<()> {
        let send = locate_field(self.page, FieldKind::Send).await?;
        self.page.click(&send).await?;
        // No confirmation marker within the window means the send failed;
        // never report silent success.
        self.page
            .wait_visible(CONFIRMATION_SELECTOR, CONFIRMATION_TIMEOUT)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::FakePage;
    use crate::errors::TaskDeskError;

    fn happy_page() -> FakePage {
        let page = FakePage::new();
        page.show(FieldKind::Compose.selectors()[0]);
        page.show(MAIN_CONTENT_SELECTOR);
        page.show(DIALOG_SELECTOR);
        page.show("input[aria-label='To']");
        page.show("input[aria-label='Cc']");
        page.show("input[aria-label='Bcc']");
        page.show("input[name='subjectbox']");
        page.show("div[aria-label='Message Body']");
        page.show("div[aria-label^='Send']");
        page.show(CONFIRMATION_SELECTOR);
        page
    }

    fn draft() -> EmailDraft {
        EmailDraft {
            to: vec!["a@x".into(), "b@x".into()],
            cc: vec!["c@x".into()],
            bcc: vec!["d@x".into()],
            subject: "Status".into(),
            body: "All green.".into(),
        }
    }

    fn store(dir: &tempfile::TempDir) -> SnapshotStore {
        SnapshotStore::new(dir.path())
    }

    #[tokio::test(start_paused = true)]
    async fn valid_draft_reaches_sent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = happy_page();
        let snapshots = store(&dir);
        let mut pipeline = ComposePipeline::new(&page, &snapshots, "https://mail.google.com");

        pipeline.login().await.expect("login");
        assert_eq!(pipeline.state(), SendState::LoggedIn);

        pipeline.send(&draft()).await.expect("send");
        assert_eq!(pipeline.state(), SendState::Sent);
        assert_eq!(page.screenshot_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn recipients_fill_in_to_cc_bcc_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = happy_page();
        let snapshots = store(&dir);
        let mut pipeline = ComposePipeline::new(&page, &snapshots, "https://mail.google.com");

        pipeline.send(&draft()).await.expect("send");

        let fills = page.fills();
        assert_eq!(
            fills,
            vec![
                "input[aria-label='To']=a@x",
                "input[aria-label='To']=b@x",
                "input[aria-label='Cc']=c@x",
                "input[aria-label='Bcc']=d@x",
                "input[name='subjectbox']=Status",
                "div[aria-label='Message Body']=All green.",
            ]
        );
        // Each recipient commit presses Enter on the field it filled.
        let enters = page
            .recorded()
            .iter()
            .filter(|c| c.starts_with("press") && c.ends_with("Enter"))
            .count();
        assert_eq!(enters, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_to_fails_fast_without_browser_interaction() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = happy_page();
        let snapshots = store(&dir);
        let mut pipeline = ComposePipeline::new(&page, &snapshots, "https://mail.google.com");

        let error = pipeline
            .send(&EmailDraft::default())
            .await
            .expect_err("empty draft");
        assert!(matches!(error, TaskDeskError::Validation(_)));
        assert!(page.recorded().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn outer_loop_restarts_from_compose_after_transient_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = happy_page();
        // First compose click opens no dialog; the second attempt succeeds.
        page.fail_visible_times(DIALOG_SELECTOR, 1);
        let snapshots = store(&dir);
        let mut pipeline = ComposePipeline::new(&page, &snapshots, "https://mail.google.com");

        pipeline.send(&draft()).await.expect("second attempt succeeds");

        assert_eq!(pipeline.state(), SendState::Sent);
        let dialog_waits = page
            .recorded()
            .iter()
            .filter(|c| c.starts_with(&format!("wait {DIALOG_SELECTOR}")))
            .count();
        assert_eq!(dialog_waits, 2);
        assert_eq!(page.screenshot_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_captures_one_snapshot_and_reraises() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = happy_page();
        // Confirmation never appears: every attempt fails at the last step.
        page.fail_visible_times(CONFIRMATION_SELECTOR, u32::MAX);
        let snapshots = store(&dir);
        let mut pipeline = ComposePipeline::new(&page, &snapshots, "https://mail.google.com");

        let error = pipeline.send(&draft()).await.expect_err("never confirmed");

        assert!(matches!(error, TaskDeskError::ElementNotFound(_)));
        assert_eq!(pipeline.state(), SendState::Failed);
        assert_eq!(page.screenshot_count(), 1);
        let files: Vec<_> = std::fs::read_dir(dir.path())
            .expect("snapshot dir")
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn subject_fill_retries_transient_failures() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = happy_page();
        page.fail_fill_times("input[name='subjectbox']", 2);
        let snapshots = store(&dir);
        let mut pipeline = ComposePipeline::new(&page, &snapshots, "https://mail.google.com");

        pipeline.send(&draft()).await.expect("inner retry absorbs failures");
        assert_eq!(pipeline.state(), SendState::Sent);
    }
}
