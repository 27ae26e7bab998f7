use std::path::{Path, PathBuf};

use crate::browser::page::PageDriver;
use crate::errors::TaskDeskResult;

/// Writes diagnostic page snapshots named `<timestamp>_<label>.png` under one
/// local directory. The only durable state this service owns.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn capture<P>(&self, page: &P, label: &str) -> TaskDeskResult<PathBuf>
    where
        P: PageDriver + ?Sized,
    {
        tokio::fs::create_dir_all(&self.dir).await?;
        let name = format!(
            "{}_{}.png",
            chrono::Local::now().format("%Y%m%d_%H%M%S"),
            label
        );
        let path = self.dir.join(name);
        let bytes = page.screenshot_png().await?;
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!(path = %path.display(), "diagnostic snapshot saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::FakePage;

    #[tokio::test]
    async fn capture_writes_labelled_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::new(dir.path());
        let page = FakePage::new();

        let path = store.capture(&page, "send_error").await.expect("capture");

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.ends_with("_send_error.png"), "unexpected name: {name}");
        let bytes = std::fs::read(&path).expect("snapshot file exists");
        assert!(!bytes.is_empty());
    }
}
