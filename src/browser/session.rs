use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use crate::browser::page::CdpPage;
use crate::config::GmailConfig;
use crate::errors::{TaskDeskError, TaskDeskResult};

/// Exclusively-owned handle to one authenticated browser context bound to a
/// persistent credential profile. Opened at pipeline entry, closed on every
/// exit path.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: CdpPage,
}

impl BrowserSession {
    pub async fn launch(config: &GmailConfig) -> TaskDeskResult<Self> {
        let profile = config.profile_dir.as_ref().ok_or_else(|| {
            TaskDeskError::SessionUnavailable("gmail profile_dir is not configured".to_string())
        })?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--start-maximized");
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }
        let browser_config = builder.build().map_err(TaskDeskError::Config)?;

        tracing::info!(profile = %profile.display(), "launching browser with persistent profile");
        let (browser, mut handler) = Browser::launch(browser_config).await?;

        // The handler stream must be pumped for the lifetime of the browser.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            handler_task,
            page: CdpPage::new(page),
        })
    }

    pub fn page(&self) -> &CdpPage {
        &self.page
    }

    /// Closes the browser; errors are logged, not propagated, so the pipeline
    /// outcome is preserved on teardown.
    pub async fn close(mut self) {
        if let Err(error) = self.browser.close().await {
            tracing::warn!(%error, "browser close failed");
        }
        if let Err(error) = self.browser.wait().await {
            tracing::warn!(%error, "browser did not exit cleanly");
        }
        self.handler_task.abort();
        tracing::debug!("browser session closed");
    }
}
