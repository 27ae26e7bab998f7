use crate::errors::{TaskDeskError, TaskDeskResult};

/// Extracts plain text from an in-memory PDF, all pages in order.
pub fn extract_text(bytes: &[u8]) -> TaskDeskResult<String> {
    let document = lopdf::Document::load_mem(bytes)
        .map_err(|error| TaskDeskError::Pdf(format!("could not parse PDF: {error}")))?;
    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Err(TaskDeskError::Pdf("document has no pages".to_string()));
    }
    document
        .extract_text(&pages)
        .map_err(|error| TaskDeskError::Pdf(format!("could not extract text: {error}")))
}
