//! Recording fake page for pipeline and locator tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::page::PageDriver;
use crate::errors::{TaskDeskError, TaskDeskResult};

/// Simulated page that records every interaction in order and can be told to
/// fail specific operations a fixed number of times.
#[derive(Default)]
pub struct FakePage {
    calls: Mutex<Vec<String>>,
    visible: Mutex<HashSet<String>>,
    fail_visible: Mutex<HashMap<String, u32>>,
    fail_fill: Mutex<HashMap<String, u32>>,
    dialog_editable: Mutex<Option<String>>,
    screenshots: AtomicUsize,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a selector as resolving to a visible element.
    pub fn show(&self, selector: &str) {
        self.visible.lock().unwrap().insert(selector.to_string());
    }

    /// The next `times` visibility waits on this selector fail even if shown.
    pub fn fail_visible_times(&self, selector: &str, times: u32) {
        self.fail_visible
            .lock()
            .unwrap()
            .insert(selector.to_string(), times);
    }

    /// The next `times` fills on this selector fail with a transient error.
    pub fn fail_fill_times(&self, selector: &str, times: u32) {
        self.fail_fill
            .lock()
            .unwrap()
            .insert(selector.to_string(), times);
    }

    pub fn set_dialog_editable(&self, selector: &str) {
        *self.dialog_editable.lock().unwrap() = Some(selector.to_string());
    }

    pub fn recorded(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Just the fills, as `selector=value` pairs, in call order.
    pub fn fills(&self) -> Vec<String> {
        self.recorded()
            .into_iter()
            .filter_map(|call| call.strip_prefix("fill ").map(str::to_string))
            .collect()
    }

    pub fn screenshot_count(&self) -> usize {
        self.screenshots.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn consume_failure(map: &Mutex<HashMap<String, u32>>, selector: &str) -> bool {
        let mut map = map.lock().unwrap();
        match map.get_mut(selector) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str) -> TaskDeskResult<()> {
        self.record(format!("goto {url}"));
        Ok(())
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> TaskDeskResult<()> {
        self.record(format!("wait {selector} {}", timeout.as_millis()));
        if Self::consume_failure(&self.fail_visible, selector) {
            return Err(TaskDeskError::ElementNotFound(selector.to_string()));
        }
        if self.visible.lock().unwrap().contains(selector) {
            Ok(())
        } else {
            Err(TaskDeskError::ElementNotFound(selector.to_string()))
        }
    }

    async fn first_editable_in_dialog(&self) -> TaskDeskResult<Option<String>> {
        self.record("dialog-scan".to_string());
        Ok(self.dialog_editable.lock().unwrap().clone())
    }

    async fn click(&self, selector: &str) -> TaskDeskResult<()> {
        self.record(format!("click {selector}"));
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> TaskDeskResult<()> {
        if Self::consume_failure(&self.fail_fill, selector) {
            self.record(format!("fill-error {selector}"));
            return Err(TaskDeskError::Automation(format!(
                "simulated fill failure on {selector}"
            )));
        }
        self.record(format!("fill {selector}={text}"));
        Ok(())
    }

    async fn press(&self, selector: &str, key: &str) -> TaskDeskResult<()> {
        self.record(format!("press {selector} {key}"));
        Ok(())
    }

    async fn screenshot_png(&self) -> TaskDeskResult<Vec<u8>> {
        self.screenshots.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}
