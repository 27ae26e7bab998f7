use std::time::Duration;

use crate::browser::PageDriver;
use crate::errors::{TaskDeskError, TaskDeskResult};
use crate::gmail::fields::FieldKind;

/// Resolves a logical field to a live selector by walking the candidate list
/// left to right, giving each candidate an equal share of the timeout budget.
///
/// If every explicit selector fails and a compose dialog is open, falls back
/// to a loose scan for any text-editing element inside the dialog; this
/// tolerates selector drift in the Gmail UI.
pub async fn locate<P>(
    page: &P,
    selectors: &[&str],
    timeout: Duration,
    description: &str,
) -> TaskDeskResult<String>
where
    P: PageDriver + ?Sized,
{
    let per_candidate = timeout / selectors.len().max(1) as u32;

    for selector in selectors {
        match page.wait_visible(selector, per_candidate).await {
            Ok(()) => return Ok(selector.to_string()),
            Err(error) => {
                tracing::debug!(selector, %error, "candidate selector did not resolve");
            }
        }
    }

    if let Some(selector) = page.first_editable_in_dialog().await? {
        tracing::debug!(%selector, description, "using dialog editable fallback");
        return Ok(selector);
    }

    Err(TaskDeskError::ElementNotFound(description.to_string()))
}

/// Convenience wrapper using the field's own selector set and budget.
pub async fn locate_field<P>(page: &P, kind: FieldKind) -> TaskDeskResult<String>
where
    P: PageDriver + ?Sized,
{
    locate(page, kind.selectors(), kind.locate_timeout(), kind.description()).await
}
