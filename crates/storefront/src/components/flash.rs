//! Server-rendered flash messages, re-shown as toasts.
//!
//! Templates render queued messages as `.alert` boxes. On load each one is
//! turned into a toast and the box is removed.

use crate::toast::{DEFAULT_DURATION, ToastId, ToastKind, ToastManager};

/// Selector of a flash message box.
pub const ALERT_SELECTOR: &str = ".alert";

/// A flash message lifted from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub text: String,
    pub kind: ToastKind,
}

impl FlashMessage {
    /// Build from an alert's class list and text content.
    #[must_use]
    pub fn from_alert(class_name: &str, text: &str) -> Self {
        Self {
            text: text.trim().to_owned(),
            kind: kind_for_alert(class_name),
        }
    }
}

/// Toast kind for an alert's class list.
#[must_use]
pub fn kind_for_alert(class_name: &str) -> ToastKind {
    let has = |class: &str| class_name.split_whitespace().any(|c| c == class);
    if has("alert-success") {
        ToastKind::Success
    } else if has("alert-danger") {
        ToastKind::Error
    } else if has("alert-warning") {
        ToastKind::Warning
    } else {
        ToastKind::Info
    }
}

/// Show every message as a toast with the default duration.
pub fn relay(
    toasts: &ToastManager,
    messages: impl IntoIterator<Item = FlashMessage>,
) -> Vec<ToastId> {
    messages
        .into_iter()
        .map(|message| toasts.show(message.text, message.kind, DEFAULT_DURATION, None))
        .collect()
}
