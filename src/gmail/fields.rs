use std::time::Duration;

/// Compose affordance in the Gmail toolbar.
pub const COMPOSE_SELECTOR: &str = "div[gh='cm']";
/// Main content region; paints quickly once the session is live.
pub const MAIN_CONTENT_SELECTOR: &str = "div[role='main']";
/// The transient compose dialog surface.
pub const DIALOG_SELECTOR: &str = "div[role='dialog']";
/// Appears once Gmail accepts the send ("Message sent" toast).
pub const CONFIRMATION_SELECTOR: &str = "span.bAq";

/// Logical form fields the pipeline interacts with. Each carries an ordered
/// candidate selector set; the first visible, interactable match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Compose,
    To,
    Cc,
    Bcc,
    Subject,
    Body,
    Send,
}

impl FieldKind {
    pub fn selectors(&self) -> &'static [&'static str] {
        match self {
            FieldKind::Compose => &[COMPOSE_SELECTOR],
            FieldKind::To => &[
                "input[aria-label='To']",
                "input[name='to']",
                "div[aria-label='To'] input",
                "input[email]",
            ],
            FieldKind::Cc => &["input[aria-label='Cc']", "input[name='cc']"],
            FieldKind::Bcc => &["input[aria-label='Bcc']", "input[name='bcc']"],
            FieldKind::Subject => &["input[name='subjectbox']", "input[aria-label='Subject']"],
            FieldKind::Body => &[
                "div[aria-label='Message Body']",
                "div[contenteditable='true']",
                "div[role='textbox']",
            ],
            FieldKind::Send => &[
                "div[aria-label^='Send']",
                "div[data-tooltip^='Send']",
                "button[aria-label='Send']",
                "div[role='button'][aria-label*='Send']",
            ],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FieldKind::Compose => "compose button",
            FieldKind::To => "To field",
            FieldKind::Cc => "Cc field",
            FieldKind::Bcc => "Bcc field",
            FieldKind::Subject => "Subject field",
            FieldKind::Body => "Message body",
            FieldKind::Send => "Send button",
        }
    }

    /// Total timeout budget for locating this field, split evenly across the
    /// candidate selectors.
    pub fn locate_timeout(&self) -> Duration {
        match self {
            FieldKind::Compose => Duration::from_secs(10),
            _ => Duration::from_secs(5),
        }
    }
}
