//! Unified client error type.
//!
//! Every failure a handler can hit funnels into [`ClientError`]. Handlers
//! never let one escape an event listener: they turn it into a toast with
//! [`ClientError::user_message`] or fall back silently, and log the detail.

use technest_core::{EmailError, QuantityError};
use thiserror::Error;

use crate::config::ConfigError;

/// Fallback text for failures the visitor cannot act on.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Client-side error type for the storefront runtime.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (offline, CORS, DNS, aborted).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the JSON body, if any.
        message: Option<String>,
    },

    /// The body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Email failed client-side validation.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Quantity failed client-side validation.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// An element the component needs is not on the page.
    #[error("Missing element: {0}")]
    MissingElement(&'static str),

    /// Configuration could not be used.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Text safe to show in a toast.
    ///
    /// Server-provided messages pass through; transport and parse details
    /// stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::InvalidEmail(_) => "Please enter a valid email address".to_string(),
            Self::InvalidQuantity(err) => format!("Please choose a valid quantity: {err}"),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// HTTP status code, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Status {
            status: 400,
            message: Some("Out of stock".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP 400: Out of stock");

        let err = ClientError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP 502");

        let err = ClientError::MissingElement("#cart-counter");
        assert_eq!(err.to_string(), "Missing element: #cart-counter");
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = ClientError::Transport("connection refused at 10.0.0.3".to_string());
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let err = ClientError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let err = ClientError::Status {
            status: 400,
            message: Some("   ".to_string()),
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_user_message_passes_server_text() {
        let err = ClientError::Status {
            status: 409,
            message: Some("Already subscribed".to_string()),
        };
        assert_eq!(err.user_message(), "Already subscribed");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_validation_messages() {
        let err = ClientError::from(EmailError::MissingAtSymbol);
        assert_eq!(err.user_message(), "Please enter a valid email address");

        let err = ClientError::from(QuantityError::AboveMaximum { max: 5 });
        assert_eq!(
            err.user_message(),
            "Please choose a valid quantity: quantity must be at most 5"
        );
    }
}
