use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page, ScreenshotParams};
use tokio::time::Instant;

use crate::errors::{TaskDeskError, TaskDeskResult};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Compose-dialog scoped candidates for the loose editable-element fallback.
const DIALOG_EDITABLE_SELECTORS: [&str; 3] = [
    "div[role='dialog'] [contenteditable='true']",
    "div[role='dialog'] input[type='text']",
    "div[role='dialog'] textarea",
];

/// The live-page operations the compose pipeline needs. Every method is a
/// suspension point; implementations never spawn parallel work on the page.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn goto(&self, url: &str) -> TaskDeskResult<()>;

    /// Resolves when the selector matches a visible element, or fails with
    /// `ElementNotFound` once the timeout budget is spent.
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> TaskDeskResult<()>;

    /// Last-resort fallback: the first text-editing element inside an open
    /// compose dialog, if any.
    async fn first_editable_in_dialog(&self) -> TaskDeskResult<Option<String>>;

    async fn click(&self, selector: &str) -> TaskDeskResult<()>;

    /// Replace-all fill semantics, not append.
    async fn fill(&self, selector: &str, text: &str) -> TaskDeskResult<()>;

    async fn press(&self, selector: &str, key: &str) -> TaskDeskResult<()>;

    async fn screenshot_png(&self) -> TaskDeskResult<Vec<u8>>;
}

/// `PageDriver` over a chromiumoxide CDP page.
pub struct CdpPage {
    page: Page,
}

impl CdpPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    async fn is_visible(&self, element: &Element) -> TaskDeskResult<bool> {
        let returned = element
            .call_js_fn(
                "function() { \
                     const rect = this.getBoundingClientRect(); \
                     return rect.width > 0 && rect.height > 0 && !this.disabled; \
                 }",
                false,
            )
            .await?;
        Ok(returned
            .result
            .value
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn goto(&self, url: &str) -> TaskDeskResult<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> TaskDeskResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                if self.is_visible(&element).await.unwrap_or(false) {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(TaskDeskError::ElementNotFound(selector.to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn first_editable_in_dialog(&self) -> TaskDeskResult<Option<String>> {
        if self.page.find_element("div[role='dialog']").await.is_err() {
            return Ok(None);
        }
        for selector in DIALOG_EDITABLE_SELECTORS {
            if self.page.find_element(selector).await.is_ok() {
                tracing::debug!(selector, "dialog fallback matched an editable element");
                return Ok(Some(selector.to_string()));
            }
        }
        Ok(None)
    }

    async fn click(&self, selector: &str) -> TaskDeskResult<()> {
        let element = self.page.find_element(selector).await?;
        element.click().await?;
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> TaskDeskResult<()> {
        let element = self.page.find_element(selector).await?;
        // Set the value directly and fire an input event so the page's
        // framework notices; typing key-by-key is too flaky for long bodies.
        let script = format!(
            "function() {{ \
                 const value = {value}; \
                 this.focus(); \
                 if (this.isContentEditable) {{ this.innerText = value; }} \
                 else {{ this.value = value; }} \
                 this.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             }}",
            value = serde_json::to_string(text)?,
        );
        element.call_js_fn(script, false).await?;
        Ok(())
    }

    async fn press(&self, selector: &str, key: &str) -> TaskDeskResult<()> {
        let element = self.page.find_element(selector).await?;
        element.press_key(key).await?;
        Ok(())
    }

    async fn screenshot_png(&self) -> TaskDeskResult<Vec<u8>> {
        let bytes = self
            .page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
            )
            .await?;
        Ok(bytes)
    }
}
